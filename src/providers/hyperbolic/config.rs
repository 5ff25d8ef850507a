//! Hyperbolic Configuration
//!
//! Immutable settings shared by every model created from one provider.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LlmError;
use crate::utils::http_headers::HttpHeaderBuilder;
use crate::utils::url::join_url;

pub const DEFAULT_BASE_URL: &str = "https://api.hyperbolic.xyz/v1";
pub const API_KEY_ENV_VAR: &str = "HYPERBOLIC_API_KEY";

/// `Strict` sends newer OpenAI fields such as `stream_options`; `Compatible`
/// leaves them out for third-party backends that reject them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compatibility {
    Strict,
    #[default]
    Compatible,
}

/// Configuration for the Hyperbolic provider
#[derive(Debug, Clone)]
pub struct HyperbolicConfig {
    /// Explicit API key; falls back to `HYPERBOLIC_API_KEY` at request time.
    pub api_key: Option<SecretString>,
    /// Base URL without trailing slash.
    pub base_url: String,
    pub custom_headers: HashMap<String, String>,
    pub compatibility: Compatibility,
    /// Merged into every chat/completion request body.
    pub extra_body: Option<Map<String, Value>>,
}

impl Default for HyperbolicConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl HyperbolicConfig {
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            custom_headers: HashMap::new(),
            compatibility: Compatibility::default(),
            extra_body: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self, LlmError> {
        HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| LlmError::ConfigurationError(format!("Invalid header name: {e}")))?;
        HeaderValue::from_str(value)
            .map_err(|e| LlmError::ConfigurationError(format!("Invalid header value: {e}")))?;
        self.custom_headers
            .insert(key.to_string(), value.to_string());
        Ok(self)
    }

    pub fn with_compatibility(mut self, compatibility: Compatibility) -> Self {
        self.compatibility = compatibility;
        self
    }

    pub fn with_extra_body(mut self, extra_body: Map<String, Value>) -> Self {
        self.extra_body = Some(extra_body);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.base_url.is_empty() {
            return Err(LlmError::ConfigurationError(
                "Base URL cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(LlmError::ConfigurationError(
                "Base URL must start with http:// or https://".to_string(),
            ));
        }

        if let Some(key) = &self.api_key
            && key.expose_secret().is_empty()
        {
            return Err(LlmError::ConfigurationError(
                "API key cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Explicit key, else the environment.
    pub fn load_api_key(&self) -> Result<SecretString, LlmError> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        match std::env::var(API_KEY_ENV_VAR) {
            Ok(key) if !key.is_empty() => Ok(SecretString::from(key)),
            _ => Err(LlmError::MissingApiKey(format!(
                "Hyperbolic API key is missing. Pass it using the 'api_key' option or the {API_KEY_ENV_VAR} environment variable."
            ))),
        }
    }

    /// Request headers: bearer auth, provider headers, then per-call headers.
    pub fn build_headers(
        &self,
        call_headers: &HashMap<String, String>,
    ) -> Result<HeaderMap, LlmError> {
        let api_key = self.load_api_key()?;
        let version = env!("CARGO_PKG_VERSION");
        let headers = HttpHeaderBuilder::new()
            .with_bearer_auth(api_key.expose_secret())?
            .with_json_content_type()
            .with_user_agent(&format!("hyperbolic-provider/{version}"))?
            .with_custom_headers(&self.custom_headers)?
            .with_custom_headers(call_headers)?
            .build();
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    #[test]
    fn test_config_creation() {
        let config = HyperbolicConfig::new();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.compatibility, Compatibility::Compatible);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let config = HyperbolicConfig::new().with_base_url("https://proxy.example.com/v1/");
        assert_eq!(config.base_url, "https://proxy.example.com/v1");
        assert_eq!(
            config.url("/chat/completions"),
            "https://proxy.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_config_validation() {
        assert!(
            HyperbolicConfig::new()
                .with_base_url("invalid-url")
                .validate()
                .is_err()
        );
        assert!(HyperbolicConfig::new().with_api_key("").validate().is_err());
    }

    #[test]
    fn test_config_with_header() {
        let config = HyperbolicConfig::new()
            .with_header("X-Custom", "test-value")
            .unwrap();
        assert_eq!(
            config.custom_headers.get("X-Custom").map(String::as_str),
            Some("test-value")
        );
        assert!(HyperbolicConfig::new().with_header("bad header", "v").is_err());
    }

    #[test]
    fn test_call_headers_override_provider_headers() {
        let config = HyperbolicConfig::new()
            .with_api_key("secret")
            .with_header("X-Env", "provider")
            .unwrap();
        let mut call = HashMap::new();
        call.insert("X-Env".to_string(), "call".to_string());
        let headers = config.build_headers(&call).unwrap();
        assert_eq!(headers.get("x-env").unwrap(), "call");
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer secret");
    }

    #[test]
    fn test_api_key_is_redacted_in_debug() {
        let config = HyperbolicConfig::new().with_api_key("super-secret");
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
