//! Canonical stream events.

use std::pin::Pin;

use futures::Stream;
use serde::Serialize;

use crate::error::LlmError;
use crate::types::{FinishReason, LogProbs, ToolCall, Usage};

/// One event of a streamed generation.
///
/// A well-formed stream ends with exactly one `Finish`. `Error` events are
/// provider-reported failures and do not end the stream; a fatal protocol
/// violation is delivered as an `Err` item instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChatStreamEvent {
    #[serde(rename_all = "camelCase")]
    TextDelta { text_delta: String },
    #[serde(rename_all = "camelCase")]
    Reasoning { text_delta: String },
    #[serde(rename_all = "camelCase")]
    ToolCallDelta {
        tool_call_id: String,
        tool_name: String,
        args_text_delta: String,
    },
    ToolCall(ToolCall),
    #[serde(rename_all = "camelCase")]
    ResponseMetadata {
        id: Option<String>,
        model_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Finish {
        finish_reason: FinishReason,
        logprobs: Option<LogProbs>,
        usage: Usage,
    },
    Error {
        #[serde(serialize_with = "serialize_error")]
        error: LlmError,
    },
}

fn serialize_error<S: serde::Serializer>(error: &LlmError, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&error.to_string())
}

/// Boxed stream of canonical events.
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<ChatStreamEvent, LlmError>> + Send>>;
