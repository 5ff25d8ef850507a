//! Per-call options for language models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use super::common::ProviderMetadata;
use super::message::ChatMessage;
use super::tools::{FunctionTool, Tool, ToolChoice};

/// What kind of output the call asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum CallMode {
    /// Free-form generation, optionally with tools.
    Regular {
        tools: Vec<Tool>,
        tool_choice: Option<ToolChoice>,
    },
    /// JSON object output via the provider's JSON mode.
    ObjectJson {
        schema: Option<serde_json::Value>,
        name: Option<String>,
        description: Option<String>,
    },
    /// JSON object output by forcing a single tool call.
    ObjectTool { tool: FunctionTool },
}

impl Default for CallMode {
    fn default() -> Self {
        Self::Regular {
            tools: Vec::new(),
            tool_choice: None,
        }
    }
}

/// Strategy a model prefers for object generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectGenerationMode {
    Json,
    Tool,
}

/// Whether the caller supplied a bare prompt or a message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Prompt,
    #[default]
    Messages,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ResponseFormat {
    Text,
    Json {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        schema: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

/// Options for a single `do_generate` / `do_stream` call.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub prompt: Vec<ChatMessage>,
    pub input_format: InputFormat,
    pub mode: CallMode,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub top_k: Option<u32>,
    pub frequency_penalty: Option<f64>,
    pub presence_penalty: Option<f64>,
    pub seed: Option<u64>,
    pub stop_sequences: Option<Vec<String>>,
    pub response_format: Option<ResponseFormat>,
    /// Extra request fields keyed by provider name.
    pub provider_metadata: Option<ProviderMetadata>,
    /// Extra HTTP headers for this call only.
    pub headers: HashMap<String, String>,
    pub abort_signal: Option<CancellationToken>,
}

impl CallOptions {
    pub fn new(prompt: Vec<ChatMessage>) -> Self {
        Self {
            prompt,
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: CallMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_tools(mut self, tools: Vec<Tool>, tool_choice: Option<ToolChoice>) -> Self {
        self.mode = CallMode::Regular { tools, tool_choice };
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_provider_metadata(
        mut self,
        provider: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        self.provider_metadata
            .get_or_insert_with(ProviderMetadata::new)
            .insert(provider.into(), value);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_abort_signal(mut self, token: CancellationToken) -> Self {
        self.abort_signal = Some(token);
        self
    }
}
