//! Hyperbolic chat model
//!
//! `/chat/completions` adapter: request building for every call mode,
//! response mapping, and streaming through [`HyperbolicChatEventConverter`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value, json};

use super::config::{Compatibility, HyperbolicConfig};
use super::convert::{convert_to_hyperbolic_chat_messages, trailing_assistant_text};
use super::error::{check_error_body, failed_response_to_error};
use super::mappers::{map_chat_logprobs, map_finish_reason};
use super::prompt::HyperbolicChatMessage;
use super::settings::{HyperbolicChatSettings, ReasoningOptions};
use super::streaming::HyperbolicChatEventConverter;
use super::tools::{HyperbolicTool, HyperbolicToolChoice, prepare_tools};
use super::types::{HyperbolicChatResponse, parse_response};
use crate::error::LlmError;
use crate::executors::HttpChatExecutor;
use crate::traits::LanguageModel;
use crate::types::{
    CallMode, CallOptions, CallWarning, GenerateResult, ObjectGenerationMode, ProviderMetadata,
    RawCall, RawResponse, ResponseFormat, ResponseMetadata, StreamResult, ToolCall, Usage,
};
use crate::utils::json::{merge_object, strip_nulls};

pub const CHAT_PROVIDER_ID: &str = "hyperbolic.chat";

/// Key under which per-call provider options are read.
pub(crate) const PROVIDER_OPTIONS_KEY: &str = "hyperbolic";

/// Fields shared by every chat request. `None` fields are dropped.
#[derive(Debug, Serialize)]
struct HyperbolicChatArgs {
    model: String,
    models: Option<Vec<String>>,
    logit_bias: Option<HashMap<String, f64>>,
    logprobs: Option<bool>,
    top_logprobs: Option<u32>,
    user: Option<String>,
    parallel_tool_calls: Option<bool>,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
    top_p: Option<f64>,
    frequency_penalty: Option<f64>,
    presence_penalty: Option<f64>,
    seed: Option<u64>,
    stop: Option<Vec<String>>,
    response_format: Option<Value>,
    top_k: Option<u32>,
    messages: Vec<HyperbolicChatMessage>,
    include_reasoning: Option<bool>,
    reasoning: Option<ReasoningOptions>,
}

/// A request body ready to send, plus the warnings raised building it.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub body: Map<String, Value>,
    pub warnings: Vec<CallWarning>,
}

impl PreparedRequest {
    /// Split the body into prompt and settings for `RawCall`.
    pub(crate) fn raw_call(&self, prompt_key: &str) -> RawCall {
        let mut settings = self.body.clone();
        let raw_prompt = settings.remove(prompt_key).unwrap_or(Value::Null);
        RawCall {
            raw_prompt,
            raw_settings: Value::Object(settings),
        }
    }
}

/// Merge extra body fields from config, model settings and the call, in
/// that order.
pub(crate) fn merge_extra_bodies(
    body: &mut Map<String, Value>,
    config: &HyperbolicConfig,
    settings_extra: Option<&Map<String, Value>>,
    call_metadata: Option<&ProviderMetadata>,
) {
    if let Some(extra) = &config.extra_body {
        merge_object(body, &Value::Object(extra.clone()));
    }
    if let Some(extra) = settings_extra {
        merge_object(body, &Value::Object(extra.clone()));
    }
    if let Some(extra) = call_metadata.and_then(|metadata| metadata.get(PROVIDER_OPTIONS_KEY)) {
        merge_object(body, extra);
    }
}

/// Add the streaming flags to a prepared body.
pub(crate) fn enable_streaming(body: &mut Map<String, Value>, compatibility: Compatibility) {
    body.insert("stream".to_string(), Value::Bool(true));
    if compatibility == Compatibility::Strict {
        body.insert(
            "stream_options".to_string(),
            json!({ "include_usage": true }),
        );
    }
}

/// Hyperbolic chat language model
#[derive(Clone)]
pub struct HyperbolicChatModel {
    model_id: String,
    settings: HyperbolicChatSettings,
    config: Arc<HyperbolicConfig>,
    executor: HttpChatExecutor,
}

impl HyperbolicChatModel {
    pub fn new(
        model_id: impl Into<String>,
        settings: HyperbolicChatSettings,
        config: Arc<HyperbolicConfig>,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            settings,
            config,
            executor: HttpChatExecutor::new(
                CHAT_PROVIDER_ID,
                http_client,
                failed_response_to_error,
            ),
        }
    }

    pub fn settings(&self) -> &HyperbolicChatSettings {
        &self.settings
    }

    /// Build the request body for a call.
    pub fn get_args(&self, options: &CallOptions) -> Result<PreparedRequest, LlmError> {
        let mut warnings = Vec::new();

        let response_format = match (&options.mode, &options.response_format) {
            (CallMode::Regular { .. }, Some(ResponseFormat::Json { schema, .. })) => {
                if schema.is_some() {
                    warnings.push(schema_warning());
                }
                Some(json!({ "type": "json_object" }))
            }
            _ => None,
        };

        let (logprobs, top_logprobs) = self
            .settings
            .logprobs
            .map(|setting| setting.chat_fields())
            .unwrap_or((None, None));

        let args = HyperbolicChatArgs {
            model: self.model_id.clone(),
            models: self.settings.models.clone(),
            logit_bias: self.settings.logit_bias.clone(),
            logprobs,
            top_logprobs,
            user: self.settings.user.clone(),
            parallel_tool_calls: self.settings.parallel_tool_calls,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
            frequency_penalty: options.frequency_penalty,
            presence_penalty: options.presence_penalty,
            seed: options.seed,
            stop: options.stop_sequences.clone(),
            response_format,
            top_k: options.top_k,
            messages: convert_to_hyperbolic_chat_messages(&options.prompt)?,
            include_reasoning: self.settings.include_reasoning,
            reasoning: self.settings.reasoning.clone(),
        };

        let mut body = match serde_json::to_value(args)? {
            Value::Object(body) => body,
            other => {
                return Err(LlmError::JsonError(format!(
                    "chat request serialized to a non-object: {other}"
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

        match &options.mode {
            CallMode::Regular { tools, tool_choice } => {
                let prepared = prepare_tools(tools, tool_choice.as_ref());
                if let Some(tools) = prepared.tools {
                    body.insert("tools".to_string(), serde_json::to_value(tools)?);
                }
                if let Some(choice) = prepared.tool_choice {
                    body.insert("tool_choice".to_string(), serde_json::to_value(choice)?);
                }
                warnings.extend(prepared.warnings);
            }
            CallMode::ObjectJson { schema, .. } => {
                if schema.is_some() {
                    warnings.push(schema_warning());
                }
                body.insert(
                    "response_format".to_string(),
                    json!({ "type": "json_object" }),
                );
            }
            CallMode::ObjectTool { tool } => {
                body.insert(
                    "tools".to_string(),
                    serde_json::to_value(vec![HyperbolicTool::from(tool)])?,
                );
                body.insert(
                    "tool_choice".to_string(),
                    serde_json::to_value(HyperbolicToolChoice::function(tool.name.clone()))?,
                );
            }
        }

        Ok(PreparedRequest { body, warnings })
    }
}

fn schema_warning() -> CallWarning {
    CallWarning::unsupported_setting_with_details(
        "responseFormat",
        "JSON response format schema is not supported",
    )
}

#[async_trait]
impl LanguageModel for HyperbolicChatModel {
    fn provider(&self) -> &str {
        CHAT_PROVIDER_ID
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn default_object_generation_mode(&self) -> Option<ObjectGenerationMode> {
        Some(ObjectGenerationMode::Tool)
    }

    async fn do_generate(&self, options: CallOptions) -> Result<GenerateResult, LlmError> {
        let request = self.get_args(&options)?;
        let headers = self.config.build_headers(&options.headers)?;
        let url = self.config.url("/chat/completions");
        let body = Value::Object(request.body.clone());

        let response = self
            .executor
            .execute(&url, headers, &body, options.abort_signal.as_ref())
            .await?;
        check_error_body(CHAT_PROVIDER_ID, &response.value)?;
        let parsed: HyperbolicChatResponse = parse_response(response.value)?;

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(LlmError::invalid_response("No choice in response"));
        };

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| {
                ToolCall::new(
                    call.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                    call.function.name,
                    call.function.arguments.unwrap_or_default(),
                )
            })
            .collect();

        let usage = parsed
            .usage
            .map(|usage| Usage::new(usage.prompt_tokens, usage.completion_tokens))
            .unwrap_or_else(|| Usage::new(0, 0));

        Ok(GenerateResult {
            text: choice.message.content,
            reasoning: choice.message.reasoning,
            tool_calls,
            finish_reason: map_finish_reason(choice.finish_reason.as_deref()),
            usage,
            logprobs: map_chat_logprobs(choice.logprobs.as_ref()),
            response: ResponseMetadata {
                id: parsed.id,
                model_id: parsed.model,
            },
            raw_call: request.raw_call("messages"),
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
        let url = self.config.url("/chat/completions");
        let body = Value::Object(request.body.clone());
        let converter = HyperbolicChatEventConverter::new(
            CHAT_PROVIDER_ID,
            trailing_assistant_text(&options.prompt),
        );

        let (stream, response_headers) = self
            .executor
            .execute_stream(&url, headers, &body, converter, options.abort_signal.clone())
            .await?;

        Ok(StreamResult {
            stream,
            raw_call: request.raw_call("messages"),
            raw_response: RawResponse {
                headers: response_headers,
            },
            warnings: request.warnings,
        })
    }
}
