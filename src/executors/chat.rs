//! Chat/completion executor

use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;

use super::{FailedResponseHandler, JsonResponse, read_json, send_json};
use crate::error::LlmError;
use crate::stream::ChatStream;
use crate::utils::http_headers::header_map_to_hash_map;
use crate::utils::streaming::{SseEventConverter, StreamFactory};
use std::collections::HashMap;

/// Generic HTTP-based chat executor
#[derive(Clone)]
pub struct HttpChatExecutor {
    pub provider_id: String,
    pub http_client: reqwest::Client,
    pub on_failure: FailedResponseHandler,
}

impl HttpChatExecutor {
    pub fn new(
        provider_id: impl Into<String>,
        http_client: reqwest::Client,
        on_failure: FailedResponseHandler,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            http_client,
            on_failure,
        }
    }

    /// Non-streaming request.
    pub async fn execute(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &serde_json::Value,
        abort: Option<&CancellationToken>,
    ) -> Result<JsonResponse, LlmError> {
        let resp = send_json(
            &self.http_client,
            &self.provider_id,
            self.on_failure,
            url,
            headers,
            body,
            abort,
        )
        .await?;
        read_json(resp, abort).await
    }

    /// Streaming request. Returns the event stream and the response headers.
    pub async fn execute_stream<C>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &serde_json::Value,
        converter: C,
        abort: Option<CancellationToken>,
    ) -> Result<(ChatStream, HashMap<String, String>), LlmError>
    where
        C: SseEventConverter + 'static,
    {
        let resp = send_json(
            &self.http_client,
            &self.provider_id,
            self.on_failure,
            url,
            headers,
            body,
            abort.as_ref(),
        )
        .await?;
        let response_headers = header_map_to_hash_map(resp.headers());
        let stream = StreamFactory::create_eventsource_stream(resp, converter, abort);
        Ok((stream, response_headers))
    }
}
