//! Cancellation utilities
//!
//! Ties a [`ChatStream`] or a request future to a caller-supplied
//! [`CancellationToken`].

use std::future::Future;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::error::LlmError;
use crate::stream::ChatStream;

/// Make a ChatStream stop when `token` is cancelled.
///
/// On cancellation the stream yields a single `Err(LlmError::Cancelled)` and
/// ends. Dropping the inner stream closes the HTTP connection so the provider
/// stops generating tokens.
pub fn make_cancellable_stream(stream: ChatStream, token: CancellationToken) -> ChatStream {
    let mut inner = stream;
    let s = async_stream::stream! {
        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!("stream cancelled by caller");
                    yield Err(LlmError::Cancelled);
                    break;
                }
                item = inner.next() => match item {
                    Some(item) => yield item,
                    None => break,
                },
            }
        }
    };
    Box::pin(s)
}

/// Run `fut` unless `token` fires first.
pub async fn run_cancellable<F, T>(
    fut: F,
    token: Option<&CancellationToken>,
) -> Result<T, LlmError>
where
    F: Future<Output = Result<T, LlmError>>,
{
    match token {
        Some(token) => tokio::select! {
            biased;
            _ = token.cancelled() => Err(LlmError::Cancelled),
            result = fut => result,
        },
        None => fut.await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::ChatStreamEvent;

    #[tokio::test]
    async fn cancelled_token_short_circuits_future() {
        let token = CancellationToken::new();
        token.cancel();
        let result: Result<(), LlmError> =
            run_cancellable(std::future::pending(), Some(&token)).await;
        assert_eq!(result, Err(LlmError::Cancelled));
    }

    #[tokio::test]
    async fn uncancelled_stream_passes_items_through() {
        let events = vec![Ok(ChatStreamEvent::TextDelta {
            text_delta: "hi".into(),
        })];
        let inner: ChatStream = Box::pin(futures::stream::iter(events.clone()));
        let collected: Vec<_> = make_cancellable_stream(inner, CancellationToken::new())
            .collect()
            .await;
        assert_eq!(collected, events);
    }

    #[tokio::test]
    async fn cancelled_stream_ends_with_cancelled_error() {
        let token = CancellationToken::new();
        let inner: ChatStream = Box::pin(futures::stream::pending());
        let stream = make_cancellable_stream(inner, token.clone());
        token.cancel();
        let collected: Vec<_> = stream.collect().await;
        assert_eq!(collected, vec![Err(LlmError::Cancelled)]);
    }
}
