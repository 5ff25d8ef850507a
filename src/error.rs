//! Error types
//!
//! One error enum shared by the chat, completion and image adapters.
//! Variants carry owned data only, so an error can be cloned into a
//! `ChatStreamEvent::Error` without losing information.

use thiserror::Error;

/// Errors produced by the provider adapters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Transport-level failure (connection, TLS, body read).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-success HTTP status that could not be mapped to a provider error.
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// Error reported by the provider in its own error envelope.
    #[error("{provider} error: {message}")]
    ProviderError {
        provider: String,
        message: String,
        error_code: Option<String>,
    },

    /// Response body or stream chunk was not valid JSON.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Serialization of a request body failed.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// The SSE transport failed mid-stream.
    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The prompt cannot be expressed for the target endpoint.
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),

    /// A mode, role, content part or tool choice the provider cannot handle.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The provider broke the response contract (e.g. zero choices,
    /// tool call without an id).
    #[error("Invalid response data: {message}")]
    InvalidResponseData {
        message: String,
        data: Option<serde_json::Value>,
    },

    /// The caller's abort signal fired.
    #[error("Request cancelled")]
    Cancelled,
}

impl LlmError {
    /// HTTP status attached to the error, when there is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Shorthand for a protocol violation without attached data.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponseData {
            message: message.into(),
            data: None,
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, LlmError>;
