//! Image generation capability trait

use crate::error::LlmError;
use crate::types::{ImageGenerateOptions, ImageGenerateResult};
use async_trait::async_trait;

#[async_trait]
pub trait ImageModel: Send + Sync {
    fn provider(&self) -> &str;

    fn model_id(&self) -> &str;

    /// How many images one request may produce.
    fn max_images_per_call(&self) -> u32 {
        1
    }

    async fn do_generate(
        &self,
        options: ImageGenerateOptions,
    ) -> Result<ImageGenerateResult, LlmError>;
}
