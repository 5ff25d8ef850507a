//! Prompt messages
//!
//! A prompt is an ordered list of [`ChatMessage`]s. The role decides which
//! [`ContentPart`] kinds are legal; adapters reject the rest.

use serde::{Deserialize, Serialize};

use super::common::ProviderMetadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
    Tool,
    Developer,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
            Self::Developer => "developer",
        }
    }
}

/// Image payload: inline bytes or a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageData {
    Bytes(Vec<u8>),
    Url(String),
}

/// File payload: a URL, or raw (already encoded) data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileData {
    Url(String),
    Data(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ContentPart {
    Text {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    Image {
        image: ImageData,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    File {
        data: FileData,
        mime_type: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    ToolCall {
        tool_call_id: String,
        tool_name: String,
        args: serde_json::Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    ToolResult {
        tool_call_id: String,
        tool_name: String,
        result: serde_json::Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        is_error: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    Reasoning {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        signature: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
    RedactedReasoning {
        data: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<ProviderMetadata>,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            provider_metadata: None,
        }
    }

    pub fn image_bytes(bytes: Vec<u8>, mime_type: Option<String>) -> Self {
        Self::Image {
            image: ImageData::Bytes(bytes),
            mime_type,
            provider_metadata: None,
        }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        Self::Image {
            image: ImageData::Url(url.into()),
            mime_type: None,
            provider_metadata: None,
        }
    }

    pub fn file_url(url: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::File {
            data: FileData::Url(url.into()),
            mime_type: mime_type.into(),
            provider_metadata: None,
        }
    }

    pub fn tool_call(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        args: serde_json::Value,
    ) -> Self {
        Self::ToolCall {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            args,
            provider_metadata: None,
        }
    }

    pub fn tool_result(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        result: serde_json::Value,
    ) -> Self {
        Self::ToolResult {
            tool_call_id: tool_call_id.into(),
            tool_name: tool_name.into(),
            result,
            is_error: None,
            provider_metadata: None,
        }
    }

    pub fn reasoning(text: impl Into<String>) -> Self {
        Self::Reasoning {
            text: text.into(),
            signature: None,
            provider_metadata: None,
        }
    }

    /// Attach provider metadata (e.g. cache control) to this part.
    pub fn with_provider_metadata(mut self, metadata: ProviderMetadata) -> Self {
        match &mut self {
            Self::Text {
                provider_metadata, ..
            }
            | Self::Image {
                provider_metadata, ..
            }
            | Self::File {
                provider_metadata, ..
            }
            | Self::ToolCall {
                provider_metadata, ..
            }
            | Self::ToolResult {
                provider_metadata, ..
            }
            | Self::Reasoning {
                provider_metadata, ..
            }
            | Self::RedactedReasoning {
                provider_metadata, ..
            } => *provider_metadata = Some(metadata),
        }
        self
    }

    pub fn provider_metadata(&self) -> Option<&ProviderMetadata> {
        match self {
            Self::Text {
                provider_metadata, ..
            }
            | Self::Image {
                provider_metadata, ..
            }
            | Self::File {
                provider_metadata, ..
            }
            | Self::ToolCall {
                provider_metadata, ..
            }
            | Self::ToolResult {
                provider_metadata, ..
            }
            | Self::Reasoning {
                provider_metadata, ..
            }
            | Self::RedactedReasoning {
                provider_metadata, ..
            } => provider_metadata.as_ref(),
        }
    }

    /// Wire-level name of the part kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::File { .. } => "file",
            Self::ToolCall { .. } => "tool-call",
            Self::ToolResult { .. } => "tool-result",
            Self::Reasoning { .. } => "reasoning",
            Self::RedactedReasoning { .. } => "redacted-reasoning",
        }
    }
}

/// Plain text or an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    MultiModal(Vec<ContentPart>),
}

impl MessageContent {
    /// View the content as parts; plain text becomes a single text part.
    pub fn parts(&self) -> Vec<ContentPart> {
        match self {
            Self::Text(text) => vec![ContentPart::text(text.clone())],
            Self::MultiModal(parts) => parts.clone(),
        }
    }

    /// Concatenation of all text parts.
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::MultiModal(parts) => parts
                .iter()
                .filter_map(|part| match part {
                    ContentPart::Text { text, .. } => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: MessageContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<ProviderMetadata>,
}

impl ChatMessage {
    pub fn new(role: MessageRole, content: MessageContent) -> Self {
        Self {
            role,
            content,
            provider_metadata: None,
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(MessageRole::System, MessageContent::Text(text.into()))
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(
            MessageRole::User,
            MessageContent::MultiModal(vec![ContentPart::text(text)]),
        )
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self::new(MessageRole::User, MessageContent::MultiModal(parts))
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(
            MessageRole::Assistant,
            MessageContent::MultiModal(vec![ContentPart::text(text)]),
        )
    }

    pub fn assistant_parts(parts: Vec<ContentPart>) -> Self {
        Self::new(MessageRole::Assistant, MessageContent::MultiModal(parts))
    }

    pub fn tool_results(parts: Vec<ContentPart>) -> Self {
        Self::new(MessageRole::Tool, MessageContent::MultiModal(parts))
    }

    pub fn with_provider_metadata(mut self, metadata: ProviderMetadata) -> Self {
        self.provider_metadata = Some(metadata);
        self
    }
}
