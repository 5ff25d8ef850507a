//! Image generation executor

use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;

use super::{FailedResponseHandler, JsonResponse, read_json, send_json};
use crate::error::LlmError;

/// Generic HTTP-based image executor
#[derive(Clone)]
pub struct HttpImageExecutor {
    pub provider_id: String,
    pub http_client: reqwest::Client,
    pub on_failure: FailedResponseHandler,
}

impl HttpImageExecutor {
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
}
