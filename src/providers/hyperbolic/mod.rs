//! Hyperbolic provider
//!
//! Adapter for the Hyperbolic inference API (`https://api.hyperbolic.xyz/v1`).
//!
//! - [`HyperbolicChatModel`]: `/chat/completions`, text, images, tools,
//!   reasoning and continuation of a trailing assistant message.
//! - [`HyperbolicCompletionModel`]: legacy `/completions` with a flattened
//!   text prompt.
//! - [`HyperbolicImageModel`]: `/image/generation`.
//!
//! Models are created from a [`HyperbolicProvider`], usually via
//! [`HyperbolicBuilder`] or [`create_hyperbolic`].

pub mod builder;
pub mod chat;
pub mod completion;
pub mod config;
pub mod convert;
pub mod error;
pub mod image;
pub mod mappers;
pub mod prompt;
pub mod provider;
pub mod settings;
pub mod streaming;
pub mod tools;
pub mod types;

pub use builder::HyperbolicBuilder;
pub use chat::{CHAT_PROVIDER_ID, HyperbolicChatModel, PreparedRequest};
pub use completion::{
    COMPLETION_PROVIDER_ID, HyperbolicCompletionEventConverter, HyperbolicCompletionModel,
};
pub use config::{API_KEY_ENV_VAR, Compatibility, DEFAULT_BASE_URL, HyperbolicConfig};
pub use convert::{convert_to_completion_prompt, convert_to_hyperbolic_chat_messages};
pub use error::{HyperbolicErrorData, failed_response_to_error, try_parsing_hyperbolic_error};
pub use image::{
    HyperbolicImageMetadata, HyperbolicImageModel, HyperbolicImageProviderOptions,
    IMAGE_PROVIDER_ID,
};
pub use mappers::{map_chat_logprobs, map_completion_logprobs, map_finish_reason};
pub use provider::{HyperbolicProvider, create_hyperbolic};
pub use settings::{
    HyperbolicChatSettings, HyperbolicCompletionSettings, HyperbolicImageSettings,
    LogprobsSetting, ReasoningEffort, ReasoningOptions,
};
pub use streaming::{HyperbolicChatEventConverter, ToolCallAccumulator};
pub use tools::{PreparedTools, prepare_tools};
