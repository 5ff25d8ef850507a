//! Per-model settings.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `true` requests logprobs; a number also requests that many alternatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogprobsSetting {
    Enabled(bool),
    Top(u32),
}

impl LogprobsSetting {
    /// `(logprobs, top_logprobs)` fields of a chat request.
    pub fn chat_fields(self) -> (Option<bool>, Option<u32>) {
        match self {
            Self::Enabled(true) => (Some(true), Some(0)),
            Self::Enabled(false) => (None, None),
            Self::Top(n) => (Some(true), Some(n)),
        }
    }

    /// `logprobs` field of a completion request.
    pub fn completion_field(self) -> Option<u32> {
        match self {
            Self::Enabled(true) => Some(0),
            Self::Enabled(false) => None,
            Self::Top(n) => Some(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    High,
    Medium,
    Low,
}

/// Reasoning token controls. Set either `max_tokens` or `effort`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningOptions {
    /// Strip reasoning from the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<ReasoningEffort>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HyperbolicChatSettings {
    /// Fallback models tried in order.
    pub models: Option<Vec<String>>,
    pub logit_bias: Option<HashMap<String, f64>>,
    pub logprobs: Option<LogprobsSetting>,
    pub parallel_tool_calls: Option<bool>,
    /// End-user identifier for abuse monitoring.
    pub user: Option<String>,
    /// Legacy switch; prefer `reasoning`.
    pub include_reasoning: Option<bool>,
    pub reasoning: Option<ReasoningOptions>,
    pub extra_body: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HyperbolicCompletionSettings {
    pub models: Option<Vec<String>>,
    pub logit_bias: Option<HashMap<String, f64>>,
    pub logprobs: Option<LogprobsSetting>,
    /// Text appended after the completion.
    pub suffix: Option<String>,
    pub user: Option<String>,
    /// Legacy switch; prefer `reasoning`.
    pub include_reasoning: Option<bool>,
    pub reasoning: Option<ReasoningOptions>,
    pub extra_body: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HyperbolicImageSettings {
    /// Defaults to 1.
    pub max_images_per_call: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logprobs_setting_fields() {
        assert_eq!(LogprobsSetting::Enabled(true).chat_fields(), (Some(true), Some(0)));
        assert_eq!(LogprobsSetting::Enabled(false).chat_fields(), (None, None));
        assert_eq!(LogprobsSetting::Top(5).chat_fields(), (Some(true), Some(5)));
        assert_eq!(LogprobsSetting::Top(3).completion_field(), Some(3));
        assert_eq!(LogprobsSetting::Enabled(true).completion_field(), Some(0));
    }

    #[test]
    fn logprobs_setting_deserializes_bool_or_number() {
        let b: LogprobsSetting = serde_json::from_str("true").unwrap();
        let n: LogprobsSetting = serde_json::from_str("2").unwrap();
        assert_eq!(b, LogprobsSetting::Enabled(true));
        assert_eq!(n, LogprobsSetting::Top(2));
    }
}
