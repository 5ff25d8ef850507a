//! HTTP executors
//!
//! Thin request/response plumbing shared by the model adapters: send a JSON
//! body, map non-success statuses through the provider's error handler, and
//! hand back the parsed body (or an SSE stream) with the response headers.

pub mod chat;
pub mod image;

pub use chat::HttpChatExecutor;
pub use image::HttpImageExecutor;

use std::collections::HashMap;

use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;

use crate::error::LlmError;
use crate::utils::cancel::run_cancellable;
use crate::utils::http_headers::header_map_to_hash_map;

/// Maps a failed HTTP response to an error: `(provider, status, body)`.
pub type FailedResponseHandler = fn(&str, u16, &str) -> LlmError;

/// Parsed JSON body plus the response headers.
#[derive(Debug, Clone)]
pub struct JsonResponse {
    pub value: serde_json::Value,
    pub headers: HashMap<String, String>,
}

/// POST `body` to `url` and return the successful response.
pub(crate) async fn send_json(
    http_client: &reqwest::Client,
    provider_id: &str,
    on_failure: FailedResponseHandler,
    url: &str,
    headers: HeaderMap,
    body: &serde_json::Value,
    abort: Option<&CancellationToken>,
) -> Result<reqwest::Response, LlmError> {
    tracing::debug!(provider = provider_id, url, "sending request");
    let request = http_client.post(url).headers(headers).json(body).send();
    let resp = run_cancellable(
        async { request.await.map_err(|e| LlmError::HttpError(e.to_string())) },
        abort,
    )
    .await?;

    let status = resp.status();
    tracing::debug!(provider = provider_id, status = status.as_u16(), "response received");
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        return Err(on_failure(provider_id, status.as_u16(), &text));
    }
    Ok(resp)
}

/// Read a successful response body as JSON.
pub(crate) async fn read_json(
    resp: reqwest::Response,
    abort: Option<&CancellationToken>,
) -> Result<JsonResponse, LlmError> {
    let headers = header_map_to_hash_map(resp.headers());
    let text = run_cancellable(
        async { resp.text().await.map_err(|e| LlmError::HttpError(e.to_string())) },
        abort,
    )
    .await?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| LlmError::ParseError(format!("Invalid JSON response: {e}")))?;
    Ok(JsonResponse { value, headers })
}
