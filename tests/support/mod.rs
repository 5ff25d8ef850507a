//! Shared helpers for integration tests
#![allow(dead_code)]

pub mod stream_fixture;

use hyperbolic_provider::error::LlmError;
use hyperbolic_provider::providers::hyperbolic::{
    Compatibility, HyperbolicBuilder, HyperbolicProvider,
};
use hyperbolic_provider::stream::ChatStreamEvent;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-key";

/// Provider pointed at the mock server's `/v1`.
pub fn provider_for(server: &MockServer) -> HyperbolicProvider {
    provider_with(server, Compatibility::Compatible)
}

pub fn provider_with(server: &MockServer, compatibility: Compatibility) -> HyperbolicProvider {
    HyperbolicBuilder::new()
        .api_key(TEST_API_KEY)
        .base_url(format!("{}/v1", server.uri()))
        .compatibility(compatibility)
        .build()
        .expect("provider builds")
}

/// Render JSON chunks as an SSE body terminated by `[DONE]`.
pub fn sse_body(chunks: &[serde_json::Value]) -> String {
    let mut body = String::new();
    for chunk in chunks {
        body.push_str(&format!("data: {chunk}\n\n"));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

/// Concatenated text deltas.
pub fn text_of(events: &[Result<ChatStreamEvent, LlmError>]) -> String {
    events
        .iter()
        .filter_map(|event| match event {
            Ok(ChatStreamEvent::TextDelta { text_delta }) => Some(text_delta.as_str()),
            _ => None,
        })
        .collect()
}

/// Number of finish events, and whether the last item is one.
pub fn finish_shape(events: &[Result<ChatStreamEvent, LlmError>]) -> (usize, bool) {
    let count = events
        .iter()
        .filter(|event| matches!(event, Ok(ChatStreamEvent::Finish { .. })))
        .count();
    let last = matches!(events.last(), Some(Ok(ChatStreamEvent::Finish { .. })));
    (count, last)
}
