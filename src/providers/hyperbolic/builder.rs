//! Hyperbolic provider builder

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};

use super::config::{Compatibility, HyperbolicConfig};
use super::provider::HyperbolicProvider;
use crate::error::LlmError;

/// Builder for [`HyperbolicProvider`].
///
/// # Example
/// ```rust,no_run
/// use hyperbolic_provider::providers::hyperbolic::HyperbolicBuilder;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), hyperbolic_provider::LlmError> {
/// let provider = HyperbolicBuilder::new()
///     .api_key("your-api-key")
///     .timeout(Duration::from_secs(60))
///     .build()?;
/// let model = provider.chat("meta-llama/Llama-3.3-70B-Instruct", Default::default());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct HyperbolicBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    headers: HashMap<String, String>,
    compatibility: Compatibility,
    extra_body: Option<Map<String, Value>>,
    http_client: Option<reqwest::Client>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl HyperbolicBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the API key. Without one, `HYPERBOLIC_API_KEY` is read per request.
    pub fn api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Override the API base URL, e.g. for a proxy.
    pub fn base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a header sent with every request
    pub fn header<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn custom_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn compatibility(mut self, compatibility: Compatibility) -> Self {
        self.compatibility = compatibility;
        self
    }

    /// Fields merged into every chat and completion request body.
    pub fn extra_body(mut self, extra_body: Map<String, Value>) -> Self {
        self.extra_body = Some(extra_body);
        self
    }

    /// Use a preconfigured HTTP client. Timeouts set on this builder are
    /// then ignored.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Validate the settings and create the provider.
    pub fn build(self) -> Result<HyperbolicProvider, LlmError> {
        let mut config = HyperbolicConfig::new().with_compatibility(self.compatibility);
        if let Some(api_key) = self.api_key {
            config = config.with_api_key(api_key);
        }
        if let Some(base_url) = self.base_url {
            config = config.with_base_url(base_url);
        }
        for (key, value) in &self.headers {
            config = config.with_header(key, value)?;
        }
        if let Some(extra_body) = self.extra_body {
            config = config.with_extra_body(extra_body);
        }
        config.validate()?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = reqwest::Client::builder();
                if let Some(timeout) = self.timeout {
                    builder = builder.timeout(timeout);
                }
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(|e| {
                    LlmError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
                })?
            }
        };

        tracing::debug!(base_url = %config.base_url, compatibility = ?config.compatibility, "hyperbolic provider built");
        Ok(HyperbolicProvider::new(Arc::new(config), http_client))
    }
}
