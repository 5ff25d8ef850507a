//! Response schemas
//!
//! Deliberately narrow: only the fields the adapters read are declared, and
//! unknown fields are ignored, so additive API changes do not break parsing.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::LlmError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HyperbolicUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TopLogProbEntry {
    pub token: String,
    pub logprob: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogProbEntry {
    pub token: String,
    pub logprob: f64,
    #[serde(default)]
    pub top_logprobs: Option<Vec<TopLogProbEntry>>,
}

/// Chat-format logprobs: one entry per sampled token.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatLogProbs {
    #[serde(default)]
    pub content: Option<Vec<LogProbEntry>>,
}

/// Completion-format logprobs: parallel arrays.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompletionLogProbs {
    pub tokens: Vec<String>,
    pub token_logprobs: Vec<f64>,
    #[serde(default)]
    pub top_logprobs: Option<Vec<BTreeMap<String, f64>>>,
}

// ---- non-streaming chat ----

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HyperbolicChatResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<HyperbolicChatChoice>,
    #[serde(default)]
    pub usage: Option<HyperbolicUsage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HyperbolicChatChoice {
    pub message: HyperbolicResponseMessage,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub logprobs: Option<ChatLogProbs>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HyperbolicResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<HyperbolicResponseToolCall>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HyperbolicResponseToolCall {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub call_type: Option<String>,
    pub function: HyperbolicResponseFunction,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HyperbolicResponseFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<String>,
}

// ---- streaming chat ----

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HyperbolicChatChunk {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<HyperbolicChunkChoice>,
    #[serde(default)]
    pub usage: Option<HyperbolicUsage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HyperbolicChunkChoice {
    #[serde(default)]
    pub delta: Option<HyperbolicDelta>,
    #[serde(default)]
    pub logprobs: Option<ChatLogProbs>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HyperbolicDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<HyperbolicToolCallDelta>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HyperbolicToolCallDelta {
    pub index: usize,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub call_type: Option<String>,
    pub function: HyperbolicFunctionDelta,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HyperbolicFunctionDelta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

// ---- completion (same shape streamed and non-streamed) ----

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HyperbolicCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<HyperbolicCompletionChoice>,
    #[serde(default)]
    pub usage: Option<HyperbolicUsage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HyperbolicCompletionChoice {
    pub text: String,
    #[serde(default)]
    pub reasoning: Option<String>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub logprobs: Option<CompletionLogProbs>,
}

// ---- image generation ----

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HyperbolicImageResponse {
    pub images: Vec<HyperbolicImage>,
    pub inference_time: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HyperbolicImage {
    /// Base64-encoded image data.
    pub image: String,
    pub index: u32,
    pub random_seed: u64,
}

/// Validate a JSON value against a response schema.
pub fn parse_response<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, LlmError> {
    serde_json::from_value::<T>(value.clone()).map_err(|e| LlmError::InvalidResponseData {
        message: format!("Type validation failed: {e}"),
        data: Some(value),
    })
}
