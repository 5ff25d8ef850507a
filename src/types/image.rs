//! Image generation options and results.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::common::{CallWarning, ProviderMetadata};

#[derive(Debug, Clone, Default)]
pub struct ImageGenerateOptions {
    pub prompt: String,
    pub n: Option<u32>,
    /// `"{width}x{height}"`.
    pub size: Option<String>,
    pub aspect_ratio: Option<String>,
    pub seed: Option<u64>,
    pub provider_options: ProviderMetadata,
    pub headers: HashMap<String, String>,
    pub abort_signal: Option<CancellationToken>,
}

impl ImageGenerateOptions {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_provider_options(
        mut self,
        provider: impl Into<String>,
        value: serde_json::Value,
    ) -> Self {
        self.provider_options.insert(provider.into(), value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponseMetadata {
    pub timestamp: DateTime<Utc>,
    pub model_id: String,
    pub headers: HashMap<String, String>,
    /// Provider-specific response details keyed by provider name.
    pub provider_metadata: ProviderMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageGenerateResult {
    /// Base64-encoded images.
    pub images: Vec<String>,
    pub warnings: Vec<CallWarning>,
    pub response: ImageResponseMetadata,
}
