//! Language model capability trait

use crate::error::LlmError;
use crate::types::{CallOptions, GenerateResult, ObjectGenerationMode, StreamResult};
use async_trait::async_trait;

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider identifier, e.g. `"hyperbolic.chat"`.
    fn provider(&self) -> &str;

    fn model_id(&self) -> &str;

    /// Preferred object generation strategy, if the model has one.
    fn default_object_generation_mode(&self) -> Option<ObjectGenerationMode> {
        None
    }

    async fn do_generate(&self, options: CallOptions) -> Result<GenerateResult, LlmError>;

    async fn do_stream(&self, options: CallOptions) -> Result<StreamResult, LlmError>;
}

/// Boxed models forward to the inner model.
#[async_trait]
impl<T: LanguageModel + ?Sized> LanguageModel for Box<T> {
    fn provider(&self) -> &str {
        (**self).provider()
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }

    fn default_object_generation_mode(&self) -> Option<ObjectGenerationMode> {
        (**self).default_object_generation_mode()
    }

    async fn do_generate(&self, options: CallOptions) -> Result<GenerateResult, LlmError> {
        (**self).do_generate(options).await
    }

    async fn do_stream(&self, options: CallOptions) -> Result<StreamResult, LlmError> {
        (**self).do_stream(options).await
    }
}
