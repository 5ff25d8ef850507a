//! Hyperbolic provider
//!
//! Entry point that hands out chat, completion and image models sharing one
//! configuration and HTTP client.

use std::sync::Arc;

use super::builder::HyperbolicBuilder;
use super::chat::HyperbolicChatModel;
use super::completion::HyperbolicCompletionModel;
use super::config::HyperbolicConfig;
use super::image::HyperbolicImageModel;
use super::settings::{HyperbolicChatSettings, HyperbolicCompletionSettings, HyperbolicImageSettings};
use crate::error::LlmError;
use crate::traits::LanguageModel;

/// Model ids served through `/completions` by [`HyperbolicProvider::language_model`].
const COMPLETION_MODEL_IDS: &[&str] = &["openai/gpt-3.5-turbo-instruct"];

#[derive(Clone)]
pub struct HyperbolicProvider {
    config: Arc<HyperbolicConfig>,
    http_client: reqwest::Client,
}

static_assertions::assert_impl_all!(HyperbolicProvider: Send, Sync);
static_assertions::assert_impl_all!(HyperbolicChatModel: Send, Sync);
static_assertions::assert_impl_all!(HyperbolicCompletionModel: Send, Sync);
static_assertions::assert_impl_all!(HyperbolicImageModel: Send, Sync);

impl HyperbolicProvider {
    pub fn new(config: Arc<HyperbolicConfig>, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    pub fn builder() -> HyperbolicBuilder {
        HyperbolicBuilder::new()
    }

    pub fn config(&self) -> &HyperbolicConfig {
        &self.config
    }

    pub fn chat(
        &self,
        model_id: impl Into<String>,
        settings: HyperbolicChatSettings,
    ) -> HyperbolicChatModel {
        HyperbolicChatModel::new(
            model_id,
            settings,
            Arc::clone(&self.config),
            self.http_client.clone(),
        )
    }

    pub fn completion(
        &self,
        model_id: impl Into<String>,
        settings: HyperbolicCompletionSettings,
    ) -> HyperbolicCompletionModel {
        HyperbolicCompletionModel::new(
            model_id,
            settings,
            Arc::clone(&self.config),
            self.http_client.clone(),
        )
    }

    pub fn image(
        &self,
        model_id: impl Into<String>,
        settings: HyperbolicImageSettings,
    ) -> HyperbolicImageModel {
        HyperbolicImageModel::new(
            model_id,
            settings,
            Arc::clone(&self.config),
            self.http_client.clone(),
        )
    }

    /// Language model for `model_id` with default settings, routed to the
    /// completion endpoint for instruct models and to chat otherwise.
    pub fn language_model(&self, model_id: &str) -> Box<dyn LanguageModel> {
        if COMPLETION_MODEL_IDS.contains(&model_id) {
            Box::new(self.completion(model_id, HyperbolicCompletionSettings::default()))
        } else {
            Box::new(self.chat(model_id, HyperbolicChatSettings::default()))
        }
    }
}

/// Create a provider from defaults and the environment.
pub fn create_hyperbolic() -> Result<HyperbolicProvider, LlmError> {
    HyperbolicBuilder::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_model_routing() {
        let provider = create_hyperbolic().unwrap();
        assert_eq!(
            provider
                .language_model("openai/gpt-3.5-turbo-instruct")
                .provider(),
            "hyperbolic.completion"
        );
        let chat = provider.language_model("meta-llama/Llama-3.3-70B-Instruct");
        assert_eq!(chat.provider(), "hyperbolic.chat");
        assert_eq!(chat.model_id(), "meta-llama/Llama-3.3-70B-Instruct");
    }

    #[test]
    fn image_model_reports_its_provider() {
        let provider = HyperbolicProvider::builder()
            .api_key("k")
            .build()
            .unwrap();
        let image = provider.image("SDXL1.0-base", HyperbolicImageSettings::default());
        assert_eq!(crate::traits::ImageModel::provider(&image), "hyperbolic.image");
    }
}
