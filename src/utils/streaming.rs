//! Common Streaming Utilities
//!
//! SSE framing via eventsource-stream, and the converter seam that turns each
//! provider event into canonical [`ChatStreamEvent`]s.

use eventsource_stream::{Event, Eventsource};
use futures::Stream;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::error::LlmError;
use crate::stream::{ChatStream, ChatStreamEvent};
use crate::utils::cancel::make_cancellable_stream;

/// Converts provider SSE events into canonical events.
///
/// A converter is owned by exactly one stream and may keep per-stream state
/// (accumulated tool calls, finish reason, usage).
pub trait SseEventConverter: Send {
    /// Convert one SSE event to zero or more events. An `Err` item is fatal:
    /// the stream yields it and ends.
    fn convert_event(&mut self, event: Event) -> Vec<Result<ChatStreamEvent, LlmError>>;

    /// Called once when the transport ends cleanly.
    fn handle_stream_end(&mut self) -> Vec<Result<ChatStreamEvent, LlmError>> {
        Vec::new()
    }
}

/// Stream factory for creating provider-specific streams
pub struct StreamFactory;

impl StreamFactory {
    /// Create a chat stream from a streaming HTTP response.
    pub fn create_eventsource_stream<C>(
        response: reqwest::Response,
        converter: C,
        cancel: Option<CancellationToken>,
    ) -> ChatStream
    where
        C: SseEventConverter + 'static,
    {
        Self::from_byte_stream(response.bytes_stream(), converter, cancel)
    }

    /// Create a chat stream from raw SSE bytes.
    ///
    /// `[DONE]` sentinels and empty payloads are skipped; the converter's
    /// `handle_stream_end` runs once after the last event.
    pub fn from_byte_stream<S, B, E, C>(
        byte_stream: S,
        converter: C,
        cancel: Option<CancellationToken>,
    ) -> ChatStream
    where
        S: Stream<Item = Result<B, E>> + Send + 'static,
        B: AsRef<[u8]> + Send + 'static,
        E: std::fmt::Display + Send + 'static,
        C: SseEventConverter + 'static,
    {
        let stream = async_stream::stream! {
            let mut converter = converter;
            let mut events = Box::pin(byte_stream.eventsource());

            while let Some(item) = events.next().await {
                match item {
                    Ok(event) => {
                        let data = event.data.trim();
                        if data.is_empty() || data == "[DONE]" {
                            continue;
                        }
                        for result in converter.convert_event(event) {
                            let fatal = result.is_err();
                            yield result;
                            if fatal {
                                tracing::debug!("stream ended by fatal conversion error");
                                return;
                            }
                        }
                    }
                    Err(e) => {
                        yield Err(LlmError::StreamError(format!("SSE parsing error: {e}")));
                        return;
                    }
                }
            }

            tracing::trace!("SSE transport finished");
            for result in converter.handle_stream_end() {
                yield result;
            }
        };

        let stream: ChatStream = Box::pin(stream);
        match cancel {
            Some(token) => make_cancellable_stream(stream, token),
            None => stream,
        }
    }
}

/// Helper utilities for efficient event building
pub struct EventBuilder {
    events: Vec<Result<ChatStreamEvent, LlmError>>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(2),
        }
    }

    pub fn add_response_metadata(&mut self, id: Option<String>, model_id: Option<String>) {
        if id.is_some() || model_id.is_some() {
            self.events
                .push(Ok(ChatStreamEvent::ResponseMetadata { id, model_id }));
        }
    }

    /// Add a TextDelta event (only if delta is not empty)
    pub fn add_text_delta(&mut self, text_delta: String) {
        if !text_delta.is_empty() {
            self.events.push(Ok(ChatStreamEvent::TextDelta { text_delta }));
        }
    }

    /// Add a Reasoning event (only if delta is not empty)
    pub fn add_reasoning(&mut self, text_delta: String) {
        if !text_delta.is_empty() {
            self.events.push(Ok(ChatStreamEvent::Reasoning { text_delta }));
        }
    }

    pub fn add_event(&mut self, event: ChatStreamEvent) {
        self.events.push(Ok(event));
    }

    pub fn add_error(&mut self, error: LlmError) {
        self.events.push(Ok(ChatStreamEvent::Error { error }));
    }

    /// Add a fatal error; the stream ends after it.
    pub fn add_fatal(&mut self, error: LlmError) {
        self.events.push(Err(error));
    }

    pub fn build(self) -> Vec<Result<ChatStreamEvent, LlmError>> {
        self.events
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoConverter {
        ended: usize,
    }

    impl SseEventConverter for EchoConverter {
        fn convert_event(&mut self, event: Event) -> Vec<Result<ChatStreamEvent, LlmError>> {
            if event.data == "boom" {
                return vec![Err(LlmError::invalid_response("boom"))];
            }
            vec![Ok(ChatStreamEvent::TextDelta {
                text_delta: event.data,
            })]
        }

        fn handle_stream_end(&mut self) -> Vec<Result<ChatStreamEvent, LlmError>> {
            self.ended += 1;
            vec![Ok(ChatStreamEvent::TextDelta {
                text_delta: format!("end{}", self.ended),
            })]
        }
    }

    fn bytes(chunks: &[&'static str]) -> impl Stream<Item = Result<&'static str, String>> + Send {
        futures::stream::iter(chunks.iter().copied().map(Ok).collect::<Vec<_>>())
    }

    fn texts(events: Vec<Result<ChatStreamEvent, LlmError>>) -> Vec<String> {
        events
            .into_iter()
            .map(|e| match e {
                Ok(ChatStreamEvent::TextDelta { text_delta }) => text_delta,
                Ok(other) => format!("{other:?}"),
                Err(err) => format!("ERR {err}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn skips_done_and_calls_end_once() {
        let stream = StreamFactory::from_byte_stream(
            bytes(&["data: a\n\n", "data: [DONE]\n\n", "data: b\n\n"]),
            EchoConverter { ended: 0 },
            None,
        );
        let out = texts(stream.collect().await);
        assert_eq!(out, vec!["a", "b", "end1"]);
    }

    #[tokio::test]
    async fn events_split_across_chunks_are_reassembled() {
        let stream = StreamFactory::from_byte_stream(
            bytes(&["data: hel", "lo\n", "\n"]),
            EchoConverter { ended: 0 },
            None,
        );
        let out = texts(stream.collect().await);
        assert_eq!(out, vec!["hello", "end1"]);
    }

    #[tokio::test]
    async fn fatal_error_ends_stream_without_flush() {
        let stream = StreamFactory::from_byte_stream(
            bytes(&["data: a\n\n", "data: boom\n\n", "data: b\n\n"]),
            EchoConverter { ended: 0 },
            None,
        );
        let out = texts(stream.collect().await);
        assert_eq!(out, vec!["a", "ERR Invalid response data: boom"]);
    }
}
