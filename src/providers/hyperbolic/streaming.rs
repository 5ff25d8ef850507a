//! Hyperbolic streaming support
//!
//! Turns `/chat/completions` SSE chunks into canonical [`ChatStreamEvent`]s.
//!
//! One converter serves one stream. It tracks the finish reason, the last
//! reported usage, accumulated logprobs and the open tool calls, and emits a
//! single `Finish` event when the transport ends.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use eventsource_stream::Event;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::{HyperbolicErrorData, is_hyperbolic_error, try_parsing_hyperbolic_error};
use super::mappers::{map_chat_logprobs, map_finish_reason};
use super::types::{HyperbolicChatChunk, HyperbolicToolCallDelta, parse_response};
use crate::error::LlmError;
use crate::stream::ChatStreamEvent;
use crate::types::{FinishReason, LogProbs, ToolCall, Usage};
use crate::utils::json::is_parsable_json;
use crate::utils::streaming::{EventBuilder, SseEventConverter};

/// Outcome of decoding one SSE payload.
pub(crate) enum ParsedChunk<T> {
    Chunk(T),
    ProviderError(HyperbolicErrorData),
    Invalid(LlmError),
}

pub(crate) fn parse_chunk<T: DeserializeOwned>(data: &str) -> ParsedChunk<T> {
    let value: Value = match serde_json::from_str(data) {
        Ok(value) => value,
        Err(e) => {
            return ParsedChunk::Invalid(LlmError::ParseError(format!(
                "Invalid JSON in stream chunk: {e}"
            )));
        }
    };

    if is_hyperbolic_error(&value) {
        return match serde_json::from_value::<HyperbolicErrorData>(value.clone()) {
            Ok(data) => ParsedChunk::ProviderError(data),
            Err(e) => ParsedChunk::Invalid(LlmError::InvalidResponseData {
                message: format!("Type validation failed: {e}"),
                data: Some(value),
            }),
        };
    }

    match parse_response::<T>(value) {
        Ok(chunk) => ParsedChunk::Chunk(chunk),
        Err(e) => ParsedChunk::Invalid(e),
    }
}

/// Error to report for an undecodable chunk: an embedded provider error if
/// the raw text carries one, else the decoding error itself.
pub(crate) fn recover_chunk_error(provider: &str, raw: &str, error: LlmError) -> LlmError {
    match try_parsing_hyperbolic_error(raw) {
        Some(data) => {
            tracing::warn!(provider, "recovered provider error from malformed chunk");
            data.into_llm_error(provider)
        }
        None => {
            tracing::warn!(provider, %error, "undecodable stream chunk");
            error
        }
    }
}

/// A tool call being assembled from deltas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCallAccumulator {
    pub id: String,
    pub name: String,
    /// Grows only by appending fragments.
    pub arguments: String,
    completed: bool,
}

impl ToolCallAccumulator {
    /// The arguments form a complete JSON document.
    pub fn is_complete(&self) -> bool {
        is_parsable_json(&self.arguments)
    }

    fn tool_call(&self) -> ToolCall {
        ToolCall::new(self.id.clone(), self.name.clone(), self.arguments.clone())
    }
}

/// Drops the echoed continuation prefix some backends replay at stream start.
#[derive(Debug, Default)]
struct EchoFilter {
    /// Trailing assistant message content, if the prompt ended with one.
    trailing_assistant: Option<String>,
    chunk_number: usize,
    trim_leading_space: bool,
}

impl EchoFilter {
    fn new(trailing_assistant: Option<String>) -> Self {
        Self {
            trailing_assistant,
            ..Default::default()
        }
    }

    fn begin_chunk(&mut self) {
        self.chunk_number += 1;
    }

    /// `None` when `text` is the echo and must be dropped.
    fn filter(&mut self, text: String) -> Option<String> {
        if self.chunk_number <= 2
            && let Some(prefix) = &self.trailing_assistant
        {
            let trimmed = prefix.trim_end();
            if text == trimmed {
                if trimmed.len() < prefix.len() {
                    self.trim_leading_space = true;
                }
                return None;
            }
        }

        let text = if self.trim_leading_space {
            text.trim_start().to_string()
        } else {
            text
        };
        self.trim_leading_space = false;
        Some(text)
    }
}

/// Chat stream converter for Hyperbolic
pub struct HyperbolicChatEventConverter {
    provider: String,
    finish_reason: FinishReason,
    usage: Usage,
    logprobs: Option<LogProbs>,
    tool_calls: HashMap<usize, ToolCallAccumulator>,
    echo: EchoFilter,
}

impl HyperbolicChatEventConverter {
    /// `trailing_assistant` is the content of the prompt's final assistant
    /// message, used to suppress its echo.
    pub fn new(provider: impl Into<String>, trailing_assistant: Option<String>) -> Self {
        Self {
            provider: provider.into(),
            finish_reason: FinishReason::Other,
            usage: Usage::unknown(),
            logprobs: None,
            tool_calls: HashMap::new(),
            echo: EchoFilter::new(trailing_assistant),
        }
    }

    pub fn finish_reason(&self) -> FinishReason {
        self.finish_reason
    }

    pub fn tool_call(&self, index: usize) -> Option<&ToolCallAccumulator> {
        self.tool_calls.get(&index)
    }

    fn process_chunk(&mut self, chunk: HyperbolicChatChunk, builder: &mut EventBuilder) {
        self.echo.begin_chunk();
        builder.add_response_metadata(chunk.id, chunk.model);

        if let Some(usage) = chunk.usage {
            self.usage = Usage::new(usage.prompt_tokens, usage.completion_tokens);
        }

        let Some(choice) = chunk.choices.into_iter().next() else {
            return;
        };

        if let Some(reason) = choice.finish_reason.as_deref() {
            self.finish_reason = map_finish_reason(Some(reason));
        }

        let Some(delta) = choice.delta else {
            return;
        };

        if let Some(content) = delta.content
            && let Some(text) = self.echo.filter(content)
        {
            builder.add_text_delta(text);
        }

        if let Some(reasoning) = delta.reasoning {
            builder.add_reasoning(reasoning);
        }

        if let Some(mapped) = map_chat_logprobs(choice.logprobs.as_ref())
            && !mapped.is_empty()
        {
            self.logprobs.get_or_insert_with(Vec::new).extend(mapped);
        }

        for tool_delta in delta.tool_calls.into_iter().flatten() {
            if let Err(error) = self.process_tool_call_delta(tool_delta, builder) {
                builder.add_fatal(error);
                return;
            }
        }
    }

    fn process_tool_call_delta(
        &mut self,
        delta: HyperbolicToolCallDelta,
        builder: &mut EventBuilder,
    ) -> Result<(), LlmError> {
        match self.tool_calls.entry(delta.index) {
            Entry::Vacant(slot) => {
                if delta.call_type.as_deref() != Some("function") {
                    return Err(invalid_tool_delta("Expected 'function' type.", &delta));
                }
                let Some(id) = delta.id.clone() else {
                    return Err(invalid_tool_delta("Expected 'id' to be a string.", &delta));
                };
                let Some(name) = delta.function.name.clone() else {
                    return Err(invalid_tool_delta(
                        "Expected 'function.name' to be a string.",
                        &delta,
                    ));
                };

                let arguments = delta.function.arguments.unwrap_or_default();
                let accumulator = slot.insert(ToolCallAccumulator {
                    id,
                    name,
                    arguments,
                    completed: false,
                });

                if !accumulator.arguments.is_empty() {
                    builder.add_event(ChatStreamEvent::ToolCallDelta {
                        tool_call_id: accumulator.id.clone(),
                        tool_name: accumulator.name.clone(),
                        args_text_delta: accumulator.arguments.clone(),
                    });
                }
                if accumulator.is_complete() {
                    accumulator.completed = true;
                    builder.add_event(ChatStreamEvent::ToolCall(accumulator.tool_call()));
                }
            }
            Entry::Occupied(mut slot) => {
                let accumulator = slot.get_mut();
                let fragment = delta.function.arguments.unwrap_or_default();
                accumulator.arguments.push_str(&fragment);

                builder.add_event(ChatStreamEvent::ToolCallDelta {
                    tool_call_id: accumulator.id.clone(),
                    tool_name: accumulator.name.clone(),
                    args_text_delta: fragment,
                });
                if !accumulator.completed && accumulator.is_complete() {
                    accumulator.completed = true;
                    builder.add_event(ChatStreamEvent::ToolCall(accumulator.tool_call()));
                }
            }
        }
        Ok(())
    }
}

fn invalid_tool_delta(message: &str, delta: &HyperbolicToolCallDelta) -> LlmError {
    LlmError::InvalidResponseData {
        message: message.to_string(),
        data: Some(serde_json::json!({
            "index": delta.index,
            "id": delta.id,
            "type": delta.call_type,
            "function": {
                "name": delta.function.name,
                "arguments": delta.function.arguments,
            },
        })),
    }
}

impl SseEventConverter for HyperbolicChatEventConverter {
    fn convert_event(&mut self, event: Event) -> Vec<Result<ChatStreamEvent, LlmError>> {
        let mut builder = EventBuilder::new();
        match parse_chunk::<HyperbolicChatChunk>(&event.data) {
            ParsedChunk::Chunk(chunk) => self.process_chunk(chunk, &mut builder),
            ParsedChunk::ProviderError(data) => {
                self.finish_reason = FinishReason::Error;
                builder.add_error(data.into_llm_error(&self.provider));
            }
            ParsedChunk::Invalid(error) => {
                self.finish_reason = FinishReason::Error;
                builder.add_error(recover_chunk_error(&self.provider, &event.data, error));
            }
        }
        builder.build()
    }

    fn handle_stream_end(&mut self) -> Vec<Result<ChatStreamEvent, LlmError>> {
        tracing::debug!(
            provider = %self.provider,
            finish_reason = self.finish_reason.as_str(),
            "chat stream finished"
        );
        vec![Ok(ChatStreamEvent::Finish {
            finish_reason: self.finish_reason,
            logprobs: self.logprobs.take(),
            usage: self.usage,
        })]
    }
}
