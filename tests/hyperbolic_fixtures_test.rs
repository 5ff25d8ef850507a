//! Hyperbolic streaming fixtures tests

use hyperbolic_provider::providers::hyperbolic::{
    HyperbolicChatEventConverter, HyperbolicCompletionEventConverter,
};
use hyperbolic_provider::stream::ChatStreamEvent;
use hyperbolic_provider::types::{FinishReason, ToolCall, Usage};
use hyperbolic_provider::LlmError;

mod support;
use support::stream_fixture::{collect_sse_events, fixture_path, load_sse_fixture_as_bytes};
use support::{finish_shape, text_of};

async fn chat_events(fixture: &str) -> Vec<Result<ChatStreamEvent, LlmError>> {
    let bytes = load_sse_fixture_as_bytes(&fixture_path(fixture)).expect("load fixture");
    collect_sse_events(bytes, HyperbolicChatEventConverter::new("hyperbolic.chat", None)).await
}

#[tokio::test]
async fn chat_text_stream_fixture() {
    let events = chat_events("hyperbolic/chat_text_stream.sse").await;

    assert_eq!(text_of(&events), "Hello, world!");
    assert!(events.iter().any(|e| matches!(
        e,
        Ok(ChatStreamEvent::ResponseMetadata { id: Some(id), .. }) if id == "chatcmpl-7f3a"
    )));
    assert_eq!(finish_shape(&events), (1, true));
    assert_eq!(
        events.last().unwrap().as_ref().unwrap(),
        &ChatStreamEvent::Finish {
            finish_reason: FinishReason::Stop,
            logprobs: None,
            usage: Usage::new(10, 4),
        }
    );
}

#[tokio::test]
async fn chat_tool_call_stream_fixture() {
    let events = chat_events("hyperbolic/chat_tool_call_stream.sse").await;

    let deltas: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            Ok(ChatStreamEvent::ToolCallDelta {
                args_text_delta, ..
            }) => Some(args_text_delta.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(deltas, vec!["{\"city\":", "\"Paris\"}"]);

    let calls: Vec<&ToolCall> = events
        .iter()
        .filter_map(|e| match e {
            Ok(ChatStreamEvent::ToolCall(call)) => Some(call),
            _ => None,
        })
        .collect();
    assert_eq!(
        calls,
        vec![&ToolCall::new("call_w1", "get_weather", "{\"city\":\"Paris\"}")]
    );

    assert!(matches!(
        events.last(),
        Some(Ok(ChatStreamEvent::Finish {
            finish_reason: FinishReason::ToolCalls,
            ..
        }))
    ));
}

#[tokio::test]
async fn chat_error_chunk_fixture() {
    let events = chat_events("hyperbolic/chat_error_chunk.sse").await;

    assert_eq!(text_of(&events), "Partial");
    let error = events
        .iter()
        .find_map(|e| match e {
            Ok(ChatStreamEvent::Error { error }) => Some(error),
            _ => None,
        })
        .expect("error event");
    assert_eq!(
        error,
        &LlmError::ProviderError {
            provider: "hyperbolic.chat".into(),
            message: "Model is overloaded, please retry".into(),
            error_code: Some("503".into()),
        }
    );
    assert_eq!(finish_shape(&events), (1, true));
    assert!(matches!(
        events.last(),
        Some(Ok(ChatStreamEvent::Finish {
            finish_reason: FinishReason::Error,
            ..
        }))
    ));
}

#[tokio::test]
async fn completion_stream_fixture() {
    let bytes = load_sse_fixture_as_bytes(&fixture_path("hyperbolic/completion_stream.sse"))
        .expect("load fixture");
    let events = collect_sse_events(
        bytes,
        HyperbolicCompletionEventConverter::new("hyperbolic.completion"),
    )
    .await;

    assert_eq!(text_of(&events), "Once upon a time");
    assert_eq!(
        events.last().unwrap().as_ref().unwrap(),
        &ChatStreamEvent::Finish {
            finish_reason: FinishReason::Length,
            logprobs: None,
            usage: Usage::new(3, 4),
        }
    );
}
