//! Hyperbolic error payloads
//!
//! The API reports errors in two shapes:
//!
//! - flat: `{"object": "error", "message": ..., "type": ..., "param": ..., "code": ...}`
//! - nested: `{"error": {"message": ..., "type": ..., "param": ..., "code": ...}}`
//!
//! Both are accepted. Stream chunks sometimes wrap the payload in plain text,
//! so [`try_parsing_hyperbolic_error`] also digs a JSON object out of a
//! malformed chunk.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LlmError;

lazy_static! {
    static ref EMBEDDED_JSON: Regex = Regex::new(r"\{.*\}").expect("static regex is valid");
}

/// Literal `"error"` marker of the flat shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorObject {
    #[serde(rename = "error")]
    Error,
}

/// `code` is numeric on some endpoints and a string on others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HyperbolicErrorBody {
    pub message: String,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub param: Option<Value>,
    #[serde(default)]
    pub code: Option<ErrorCode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatErrorResponse {
    pub object: ErrorObject,
    #[serde(flatten)]
    pub body: HyperbolicErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HyperbolicErrorData {
    Flat(FlatErrorResponse),
    Nested { error: HyperbolicErrorBody },
}

impl HyperbolicErrorData {
    pub fn body(&self) -> &HyperbolicErrorBody {
        match self {
            Self::Flat(flat) => &flat.body,
            Self::Nested { error } => error,
        }
    }

    pub fn message(&self) -> &str {
        &self.body().message
    }

    pub fn code(&self) -> Option<String> {
        self.body().code.as_ref().map(ToString::to_string)
    }

    /// Canonical error carrying the provider's message.
    pub fn into_llm_error(self, provider: &str) -> LlmError {
        let error_code = self.code().or_else(|| self.body().error_type.clone());
        LlmError::ProviderError {
            provider: provider.to_string(),
            message: self.message().to_string(),
            error_code,
        }
    }
}

/// Whether a decoded payload uses one of the error shapes.
pub fn is_hyperbolic_error(value: &Value) -> bool {
    value.get("object").and_then(Value::as_str) == Some("error")
        || value.get("error").is_some_and(Value::is_object)
}

/// Extract an error payload from text that mixes prose and JSON.
pub fn try_parsing_hyperbolic_error(text: &str) -> Option<HyperbolicErrorData> {
    let found = EMBEDDED_JSON.find(text)?;
    let value: Value = serde_json::from_str(found.as_str()).ok()?;
    let has_message = value.get("message").is_some()
        || value
            .get("error")
            .and_then(|error| error.get("message"))
            .is_some();
    if !has_message {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Reject a successful response whose body is an error payload.
pub fn check_error_body(provider: &str, value: &Value) -> Result<(), LlmError> {
    if !is_hyperbolic_error(value) {
        return Ok(());
    }
    match serde_json::from_value::<HyperbolicErrorData>(value.clone()) {
        Ok(data) => Err(data.into_llm_error(provider)),
        Err(_) => Ok(()),
    }
}

/// Map a non-success HTTP response to an error.
///
/// A recognised error body yields an `ApiError` with the provider's message;
/// anything else keeps the raw body text.
pub fn failed_response_to_error(provider: &str, status: u16, body: &str) -> LlmError {
    let parsed = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        serde_json::from_value::<HyperbolicErrorData>(value.clone())
            .ok()
            .map(|data| (data, value))
    });

    match parsed {
        Some((data, details)) => {
            tracing::debug!(provider, status, message = data.message(), "provider error");
            LlmError::ApiError {
                code: status,
                message: data.message().to_string(),
                details: Some(details),
            }
        }
        None => LlmError::ApiError {
            code: status,
            message: if body.trim().is_empty() {
                format!("{provider} request failed with status {status}")
            } else {
                body.to_string()
            },
            details: None,
        },
    }
}
