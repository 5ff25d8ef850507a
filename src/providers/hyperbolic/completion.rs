//! Hyperbolic completion model
//!
//! Legacy `/completions` adapter. The prompt is flattened to text, so tools
//! and object generation are not available here.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use eventsource_stream::Event;
use serde::Serialize;
use serde_json::Value;

use super::chat::{PreparedRequest, enable_streaming, merge_extra_bodies};
use super::config::HyperbolicConfig;
use super::convert::convert_to_completion_prompt;
use super::error::{check_error_body, failed_response_to_error};
use super::mappers::{map_completion_logprobs, map_finish_reason};
use super::settings::{HyperbolicCompletionSettings, ReasoningOptions};
use super::streaming::{ParsedChunk, parse_chunk, recover_chunk_error};
use super::types::{HyperbolicCompletionResponse, parse_response};
use crate::error::LlmError;
use crate::executors::HttpChatExecutor;
use crate::stream::ChatStreamEvent;
use crate::traits::LanguageModel;
use crate::types::{
    CallMode, CallOptions, CallWarning, FinishReason, GenerateResult, LogProbs, RawResponse,
    ResponseFormat, ResponseMetadata, StreamResult, Usage,
};
use crate::utils::json::strip_nulls;
use crate::utils::streaming::{EventBuilder, SseEventConverter};

pub const COMPLETION_PROVIDER_ID: &str = "hyperbolic.completion";

#[derive(Debug, Serialize)]
struct HyperbolicCompletionArgs {
    model: String,
    models: Option<Vec<String>>,
    logit_bias: Option<HashMap<String, f64>>,
    logprobs: Option<u32>,
    suffix: Option<String>,
    user: Option<String>,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
    top_p: Option<f64>,
    frequency_penalty: Option<f64>,
    presence_penalty: Option<f64>,
    seed: Option<u64>,
    stop: Option<Vec<String>>,
    top_k: Option<u32>,
    prompt: String,
    include_reasoning: Option<bool>,
    reasoning: Option<ReasoningOptions>,
}

/// Hyperbolic completion language model
#[derive(Clone)]
pub struct HyperbolicCompletionModel {
    model_id: String,
    settings: HyperbolicCompletionSettings,
    config: Arc<HyperbolicConfig>,
    executor: HttpChatExecutor,
}

impl HyperbolicCompletionModel {
    pub fn new(
        model_id: impl Into<String>,
        settings: HyperbolicCompletionSettings,
        config: Arc<HyperbolicConfig>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            settings,
            config,
            executor: HttpChatExecutor::new(
                COMPLETION_PROVIDER_ID,
                http_client,
                failed_response_to_error,
            ),
        }
    }

    pub fn settings(&self) -> &HyperbolicCompletionSettings {
        &self.settings
    }

    pub fn get_args(&self, options: &CallOptions) -> Result<PreparedRequest, LlmError> {
        let mut warnings = Vec::new();

        match &options.mode {
            CallMode::Regular { tools, tool_choice } => {
                if !tools.is_empty() {
                    warnings.push(CallWarning::unsupported_setting_with_details(
                        "tools",
                        "Tools are not supported by completion models",
                    ));
                }
                if tool_choice.is_some() {
                    warnings.push(CallWarning::unsupported_setting_with_details(
                        "toolChoice",
                        "Tool choice is not supported by completion models",
                    ));
                }
            }
            CallMode::ObjectJson { .. } => {
                return Err(LlmError::UnsupportedOperation(
                    "object-json mode is not supported by completion models".to_string(),
                ));
            }
            CallMode::ObjectTool { .. } => {
                return Err(LlmError::UnsupportedOperation(
                    "object-tool mode is not supported by completion models".to_string(),
                ));
            }
        }

        if let Some(ResponseFormat::Json { .. }) = &options.response_format {
            warnings.push(CallWarning::unsupported_setting_with_details(
                "responseFormat",
                "JSON response format is not supported by completion models",
            ));
        }

        let args = HyperbolicCompletionArgs {
            model: self.model_id.clone(),
            models: self.settings.models.clone(),
            logit_bias: self.settings.logit_bias.clone(),
            logprobs: self
                .settings
                .logprobs
                .and_then(|setting| setting.completion_field()),
            suffix: self.settings.suffix.clone(),
            user: self.settings.user.clone(),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
            frequency_penalty: options.frequency_penalty,
            presence_penalty: options.presence_penalty,
            seed: options.seed,
            stop: options.stop_sequences.clone(),
            top_k: options.top_k,
            prompt: convert_to_completion_prompt(&options.prompt, options.input_format)?,
            include_reasoning: self.settings.include_reasoning,
            reasoning: self.settings.reasoning.clone(),
        };

        let mut body = match serde_json::to_value(args)? {
            Value::Object(body) => body,
            other => {
                return Err(LlmError::JsonError(format!(
                    "completion request serialized to a non-object: {other}"
                )));
            }
        };
        strip_nulls(&mut body);
        merge_extra_bodies(
            &mut body,
            &self.config,
            self.settings.extra_body.as_ref(),
            options.provider_metadata.as_ref(),
        );

        Ok(PreparedRequest { body, warnings })
    }
}

#[async_trait]
impl LanguageModel for HyperbolicCompletionModel {
    fn provider(&self) -> &str {
        COMPLETION_PROVIDER_ID
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn do_generate(&self, options: CallOptions) -> Result<GenerateResult, LlmError> {
        let request = self.get_args(&options)?;
        let headers = self.config.build_headers(&options.headers)?;
        let url = self.config.url("/completions");
        let body = Value::Object(request.body.clone());

        let response = self
            .executor
            .execute(&url, headers, &body, options.abort_signal.as_ref())
            .await?;
        check_error_body(COMPLETION_PROVIDER_ID, &response.value)?;
        let parsed: HyperbolicCompletionResponse = parse_response(response.value)?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(LlmError::invalid_response(
                "No choice in Hyperbolic completion response",
            ));
        };

        let usage = parsed
            .usage
            .map(|usage| Usage::new(usage.prompt_tokens, usage.completion_tokens))
            .unwrap_or_else(|| Usage::new(0, 0));

        Ok(GenerateResult {
            text: Some(choice.text),
            reasoning: choice.reasoning,
            tool_calls: Vec::new(),
            finish_reason: map_finish_reason(choice.finish_reason.as_deref()),
            usage,
            logprobs: map_completion_logprobs(choice.logprobs.as_ref()),
            response: ResponseMetadata {
                id: parsed.id,
                model_id: parsed.model,
            },
            raw_call: request.raw_call("prompt"),
            raw_response: RawResponse {
                headers: response.headers,
            },
            warnings: request.warnings,
        })
    }

    async fn do_stream(&self, options: CallOptions) -> Result<StreamResult, LlmError> {
        let mut request = self.get_args(&options)?;
        enable_streaming(&mut request.body, self.config.compatibility);

        let headers = self.config.build_headers(&options.headers)?;
        let url = self.config.url("/completions");
        let body = Value::Object(request.body.clone());
        let converter = HyperbolicCompletionEventConverter::new(COMPLETION_PROVIDER_ID);

        let (stream, response_headers) = self
            .executor
            .execute_stream(&url, headers, &body, converter, options.abort_signal.clone())
            .await?;

        Ok(StreamResult {
            stream,
            raw_call: request.raw_call("prompt"),
            raw_response: RawResponse {
                headers: response_headers,
            },
            warnings: request.warnings,
        })
    }
}

/// Completion stream converter for Hyperbolic
pub struct HyperbolicCompletionEventConverter {
    provider: String,
    finish_reason: FinishReason,
    usage: Usage,
    logprobs: Option<LogProbs>,
}

impl HyperbolicCompletionEventConverter {
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            finish_reason: FinishReason::Other,
            usage: Usage::unknown(),
            logprobs: None,
        }
    }

    fn process_chunk(&mut self, chunk: HyperbolicCompletionResponse, builder: &mut EventBuilder) {
        if let Some(usage) = chunk.usage {
            self.usage = Usage::new(usage.prompt_tokens, usage.completion_tokens);
        }

        let Some(choice) = chunk.choices.into_iter().next() else {
            return;
        };

        if let Some(reason) = choice.finish_reason.as_deref() {
            self.finish_reason = map_finish_reason(Some(reason));
        }

        builder.add_text_delta(choice.text);
        if let Some(reasoning) = choice.reasoning {
            builder.add_reasoning(reasoning);
        }

        if let Some(mapped) = map_completion_logprobs(choice.logprobs.as_ref())
            && !mapped.is_empty()
        {
            self.logprobs.get_or_insert_with(Vec::new).extend(mapped);
        }
    }
}

impl SseEventConverter for HyperbolicCompletionEventConverter {
    fn convert_event(&mut self, event: Event) -> Vec<Result<ChatStreamEvent, LlmError>> {
        let mut builder = EventBuilder::new();
        match parse_chunk::<HyperbolicCompletionResponse>(&event.data) {
            ParsedChunk::Chunk(chunk) => self.process_chunk(chunk, &mut builder),
            ParsedChunk::ProviderError(data) => {
                self.finish_reason = FinishReason::Error;
                builder.add_error(data.into_llm_error(&self.provider));
            }
            ParsedChunk::Invalid(error) => {
                self.finish_reason = FinishReason::Error;
                builder.add_error(recover_chunk_error(&self.provider, &event.data, error));
            }
        }
        builder.build()
    }

    fn handle_stream_end(&mut self) -> Vec<Result<ChatStreamEvent, LlmError>> {
        tracing::debug!(
            provider = %self.provider,
            finish_reason = self.finish_reason.as_str(),
            "completion stream finished"
        );
        vec![Ok(ChatStreamEvent::Finish {
            finish_reason: self.finish_reason,
            logprobs: self.logprobs.take(),
            usage: self.usage,
        })]
    }
}
