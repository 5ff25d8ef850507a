//! Results of language model calls.

use std::collections::HashMap;

use serde::Serialize;

use super::common::{CallWarning, FinishReason, LogProbs, Usage};
use super::tools::ToolCall;
use crate::stream::ChatStream;

/// Identity of the response as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub id: Option<String>,
    pub model_id: Option<String>,
}

/// The request as sent: the prompt part and everything else.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCall {
    pub raw_prompt: serde_json::Value,
    pub raw_settings: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct RawResponse {
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResult {
    pub text: Option<String>,
    pub reasoning: Option<String>,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: FinishReason,
    pub usage: Usage,
    pub logprobs: Option<LogProbs>,
    pub response: ResponseMetadata,
    pub raw_call: RawCall,
    pub raw_response: RawResponse,
    pub warnings: Vec<CallWarning>,
}

/// A lazily consumed event stream plus the request context it came from.
pub struct StreamResult {
    pub stream: ChatStream,
    pub raw_call: RawCall,
    pub raw_response: RawResponse,
    pub warnings: Vec<CallWarning>,
}

impl std::fmt::Debug for StreamResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamResult")
            .field("raw_call", &self.raw_call)
            .field("raw_response", &self.raw_response)
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}
