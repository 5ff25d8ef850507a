//! Hyperbolic image model

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::chat::PROVIDER_OPTIONS_KEY;
use super::config::HyperbolicConfig;
use super::error::failed_response_to_error;
use super::settings::HyperbolicImageSettings;
use super::types::{HyperbolicImageResponse, parse_response};
use crate::error::LlmError;
use crate::executors::HttpImageExecutor;
use crate::traits::ImageModel;
use crate::types::{
    CallWarning, ImageGenerateOptions, ImageGenerateResult, ImageResponseMetadata,
    ProviderMetadata,
};

pub const IMAGE_PROVIDER_ID: &str = "hyperbolic.image";

/// Options read from `provider_options["hyperbolic"]`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperbolicImageProviderOptions {
    pub cfg_scale: Option<f64>,
    pub negative_prompt: Option<String>,
    pub steps: Option<u32>,
    pub strength: Option<f64>,
    pub enable_refiner: Option<bool>,
}

/// Generation details returned under `provider_metadata["hyperbolic"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HyperbolicImageMetadata {
    pub inference_time: f64,
    pub random_seeds: Vec<u64>,
}

impl HyperbolicImageMetadata {
    /// Read the metadata back from an image response.
    pub fn from_response(response: &ImageResponseMetadata) -> Option<Self> {
        let value = response.provider_metadata.get(PROVIDER_OPTIONS_KEY)?;
        serde_json::from_value(value.clone()).ok()
    }
}

#[derive(Debug, Serialize)]
struct HyperbolicImageArgs<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cfg_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    enable_refiner: Option<bool>,
    model_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strength: Option<f64>,
}

/// Parse `"{width}x{height}"`.
pub fn parse_size(size: &str) -> Result<(u32, u32), LlmError> {
    let invalid =
        || LlmError::InvalidParameter(format!("Invalid image size '{size}', expected WIDTHxHEIGHT"));
    let (width, height) = size.split_once('x').ok_or_else(invalid)?;
    let width = width.trim().parse().map_err(|_| invalid())?;
    let height = height.trim().parse().map_err(|_| invalid())?;
    Ok((width, height))
}

/// Hyperbolic image generation model
#[derive(Clone)]
pub struct HyperbolicImageModel {
    model_id: String,
    settings: HyperbolicImageSettings,
    config: Arc<HyperbolicConfig>,
    executor: HttpImageExecutor,
}

impl HyperbolicImageModel {
    pub fn new(
        model_id: impl Into<String>,
        settings: HyperbolicImageSettings,
        config: Arc<HyperbolicConfig>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            settings,
            config,
            executor: HttpImageExecutor::new(
                IMAGE_PROVIDER_ID,
                http_client,
                failed_response_to_error,
            ),
        }
    }

    /// Request body and warnings for a call.
    pub fn get_args(
        &self,
        options: &ImageGenerateOptions,
    ) -> Result<(Value, Vec<CallWarning>), LlmError> {
        let mut warnings = Vec::new();

        let (width, height) = match options.size.as_deref() {
            Some(size) => {
                let (width, height) = parse_size(size)?;
                (Some(width), Some(height))
            }
            None => (None, None),
        };

        let provider_options = provider_options(&options.provider_options)?;

        if options.aspect_ratio.is_some() {
            warnings.push(CallWarning::unsupported_setting_with_details(
                "aspectRatio",
                "This model does not support `aspectRatio`. Use `size` instead.",
            ));
        }
        if options.seed.is_some() {
            warnings.push(CallWarning::unsupported_setting_with_details(
                "seed",
                "This model does not support `seed`.",
            ));
        }
        if options.n.is_some_and(|n| n > 1) {
            warnings.push(CallWarning::unsupported_setting_with_details(
                "n",
                "This model does not support `n`.",
            ));
        }

        let args = HyperbolicImageArgs {
            prompt: &options.prompt,
            height,
            width,
            cfg_scale: provider_options.cfg_scale,
            enable_refiner: provider_options.enable_refiner,
            model_name: &self.model_id,
            negative_prompt: provider_options.negative_prompt,
            steps: provider_options.steps,
            strength: provider_options.strength,
        };

        Ok((serde_json::to_value(args)?, warnings))
    }
}

fn provider_options(
    options: &ProviderMetadata,
) -> Result<HyperbolicImageProviderOptions, LlmError> {
    match options.get(PROVIDER_OPTIONS_KEY) {
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            LlmError::InvalidInput(format!("Invalid hyperbolic image provider options: {e}"))
        }),
        None => Ok(HyperbolicImageProviderOptions::default()),
    }
}

#[async_trait]
impl ImageModel for HyperbolicImageModel {
    fn provider(&self) -> &str {
        IMAGE_PROVIDER_ID
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn max_images_per_call(&self) -> u32 {
        self.settings.max_images_per_call.unwrap_or(1)
    }

    async fn do_generate(
        &self,
        options: ImageGenerateOptions,
    ) -> Result<ImageGenerateResult, LlmError> {
        let (body, warnings) = self.get_args(&options)?;
        let headers = self.config.build_headers(&options.headers)?;
        let url = self.config.url("/image/generation");

        let response = self
            .executor
            .execute(&url, headers, &body, options.abort_signal.as_ref())
            .await?;
        let parsed: HyperbolicImageResponse = parse_response(response.value)?;
        tracing::debug!(
            model = %self.model_id,
            images = parsed.images.len(),
            inference_time = parsed.inference_time,
            "image generation finished"
        );

        let metadata = HyperbolicImageMetadata {
            inference_time: parsed.inference_time,
            random_seeds: parsed.images.iter().map(|image| image.random_seed).collect(),
        };
        let mut provider_metadata = ProviderMetadata::new();
        provider_metadata.insert(
            PROVIDER_OPTIONS_KEY.to_string(),
            serde_json::to_value(&metadata)?,
        );

        Ok(ImageGenerateResult {
            images: parsed.images.into_iter().map(|image| image.image).collect(),
            warnings,
            response: ImageResponseMetadata {
                timestamp: chrono::Utc::now(),
                model_id: self.model_id.clone(),
                headers: response.headers,
                provider_metadata,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model() -> HyperbolicImageModel {
        HyperbolicImageModel::new(
            "SDXL1.0-base",
            HyperbolicImageSettings::default(),
            Arc::new(HyperbolicConfig::new()),
            reqwest::Client::new(),
        )
    }

    #[test]
    fn size_parsing() {
        assert_eq!(parse_size("1024x768").unwrap(), (1024, 768));
        assert!(matches!(
            parse_size("1024"),
            Err(LlmError::InvalidParameter(_))
        ));
        assert!(parse_size("axb").is_err());
    }

    #[test]
    fn size_and_aspect_ratio() {
        let mut options = ImageGenerateOptions::new("a cat").with_size("1024x1024");
        options.aspect_ratio = Some("16:9".into());
        let (body, warnings) = model().get_args(&options).unwrap();
        assert_eq!(body["width"], json!(1024));
        assert_eq!(body["height"], json!(1024));
        assert!(body.get("aspect_ratio").is_none());
        assert_eq!(
            warnings,
            vec![CallWarning::unsupported_setting_with_details(
                "aspectRatio",
                "This model does not support `aspectRatio`. Use `size` instead."
            )]
        );
    }

    #[test]
    fn provider_options_are_forwarded() {
        let options = ImageGenerateOptions::new("a cat").with_provider_options(
            "hyperbolic",
            json!({"cfgScale": 7.5, "negativePrompt": "dogs", "steps": 30, "enableRefiner": true}),
        );
        let (body, _) = model().get_args(&options).unwrap();
        assert_eq!(
            body,
            json!({
                "prompt": "a cat",
                "cfg_scale": 7.5,
                "enable_refiner": true,
                "model_name": "SDXL1.0-base",
                "negative_prompt": "dogs",
                "steps": 30
            })
        );
    }

    #[test]
    fn malformed_provider_options_are_rejected() {
        let options = ImageGenerateOptions::new("a cat")
            .with_provider_options("hyperbolic", json!({"steps": "many"}));
        assert!(matches!(
            model().get_args(&options),
            Err(LlmError::InvalidInput(_))
        ));
    }

    #[test]
    fn seed_and_n_warn() {
        let mut options = ImageGenerateOptions::new("a cat");
        options.seed = Some(1);
        options.n = Some(2);
        let (_, warnings) = model().get_args(&options).unwrap();
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn single_image_request_does_not_warn() {
        let mut options = ImageGenerateOptions::new("a cat");
        options.n = Some(1);
        let (_, warnings) = model().get_args(&options).unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn max_images_defaults_to_one() {
        assert_eq!(model().max_images_per_call(), 1);
    }
}
