//! Finish-reason and logprobs mapping.

use super::types::{ChatLogProbs, CompletionLogProbs};
use crate::types::{FinishReason, LogProb, LogProbs, TopLogProb};

pub fn map_finish_reason(finish_reason: Option<&str>) -> FinishReason {
    match finish_reason {
        Some("stop") => FinishReason::Stop,
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        Some("function_call") | Some("tool_calls") => FinishReason::ToolCalls,
        _ => FinishReason::Unknown,
    }
}

/// Chat logprobs; `None` when the provider sent no `content` list.
pub fn map_chat_logprobs(logprobs: Option<&ChatLogProbs>) -> Option<LogProbs> {
    let content = logprobs?.content.as_ref()?;
    Some(
        content
            .iter()
            .map(|entry| LogProb {
                token: entry.token.clone(),
                logprob: entry.logprob,
                top_logprobs: entry
                    .top_logprobs
                    .iter()
                    .flatten()
                    .map(|top| TopLogProb {
                        token: top.token.clone(),
                        logprob: top.logprob,
                    })
                    .collect(),
            })
            .collect(),
    )
}

/// Completion logprobs. A missing `token_logprobs` entry counts as 0.
pub fn map_completion_logprobs(logprobs: Option<&CompletionLogProbs>) -> Option<LogProbs> {
    let logprobs = logprobs?;
    Some(
        logprobs
            .tokens
            .iter()
            .enumerate()
            .map(|(index, token)| LogProb {
                token: token.clone(),
                logprob: logprobs.token_logprobs.get(index).copied().unwrap_or(0.0),
                top_logprobs: logprobs
                    .top_logprobs
                    .as_ref()
                    .and_then(|tops| tops.get(index))
                    .map(|top| {
                        top.iter()
                            .map(|(token, logprob)| TopLogProb {
                                token: token.clone(),
                                logprob: *logprob,
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect(),
    )
}
