//! # hyperbolic-provider
//!
//! Hyperbolic inference API adapter with a provider-agnostic model surface.
//!
//! Callers build a canonical prompt ([`types::ChatMessage`]), pass it with
//! [`types::CallOptions`] to a [`traits::LanguageModel`], and get back either a
//! [`types::GenerateResult`] or a stream of [`stream::ChatStreamEvent`]s. The
//! Hyperbolic adapter translates both directions, including incremental tool
//! call assembly and provider error payloads embedded in stream chunks.
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use hyperbolic_provider::prelude::*;
//!
//! # async fn run() -> Result<(), LlmError> {
//! let provider = HyperbolicBuilder::new().api_key("your-api-key").build()?;
//! let model = provider.chat("meta-llama/Llama-3.3-70B-Instruct", Default::default());
//!
//! let result = model
//!     .do_stream(CallOptions::new(vec![ChatMessage::user("Hello!")]))
//!     .await?;
//! let mut stream = result.stream;
//! while let Some(event) = stream.next().await {
//!     if let ChatStreamEvent::TextDelta { text_delta } = event? {
//!         print!("{text_delta}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
#![deny(unsafe_code)]

pub mod error;
pub mod executors;
pub mod providers;
pub mod stream;
pub mod traits;
pub mod types;
pub mod utils;

pub use error::LlmError;

pub mod prelude {
    pub use crate::error::LlmError;
    pub use crate::providers::hyperbolic::{
        Compatibility, HyperbolicBuilder, HyperbolicChatSettings, HyperbolicCompletionSettings,
        HyperbolicImageSettings, HyperbolicProvider, create_hyperbolic,
    };
    pub use crate::stream::{ChatStream, ChatStreamEvent};
    pub use crate::traits::{ImageModel, LanguageModel};
    pub use crate::types::*;
}
