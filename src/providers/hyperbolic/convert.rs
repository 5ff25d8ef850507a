//! Prompt conversion
//!
//! Canonical prompt → Hyperbolic chat messages, and canonical prompt → the
//! flat text prompt used by the legacy `/completions` endpoint.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use super::prompt::{
    CacheControl, HyperbolicChatMessage, HyperbolicFunctionCall, HyperbolicToolCall, ImageUrl,
    UserContent, UserContentPart,
};
use crate::error::LlmError;
use crate::types::{
    ChatMessage, ContentPart, FileData, ImageData, InputFormat, MessageContent, MessageRole,
    ProviderMetadata,
};

const DEFAULT_IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Metadata namespaces searched for a cache-control hint, in order.
const CACHE_CONTROL_NAMESPACES: [&str; 2] = ["anthropic", "hyperbolic"];

/// Read `cacheControl` / `cache_control` from provider metadata.
pub fn get_cache_control(metadata: Option<&ProviderMetadata>) -> Option<CacheControl> {
    let metadata = metadata?;
    CACHE_CONTROL_NAMESPACES.iter().find_map(|namespace| {
        let entry = metadata.get(*namespace)?;
        let value = entry
            .get("cacheControl")
            .or_else(|| entry.get("cache_control"))?;
        serde_json::from_value(value.clone()).ok()
    })
}

fn unsupported_part(part: &ContentPart, role: MessageRole) -> LlmError {
    LlmError::UnsupportedOperation(format!(
        "Unsupported content part: {} in {} message",
        part.kind(),
        role.as_str()
    ))
}

/// Convert a canonical prompt into Hyperbolic chat messages.
///
/// A trailing assistant message is sent with `prefix: true` so the model
/// continues it.
pub fn convert_to_hyperbolic_chat_messages(
    prompt: &[ChatMessage],
) -> Result<Vec<HyperbolicChatMessage>, LlmError> {
    let mut messages = Vec::with_capacity(prompt.len());

    for message in prompt {
        let message_cache = get_cache_control(message.provider_metadata.as_ref());

        match message.role {
            MessageRole::System => {
                let content = match &message.content {
                    MessageContent::Text(text) => text.clone(),
                    MessageContent::MultiModal(parts) => {
                        let mut text = String::new();
                        for part in parts {
                            match part {
                                ContentPart::Text { text: t, .. } => text.push_str(t),
                                other => return Err(unsupported_part(other, message.role)),
                            }
                        }
                        text
                    }
                };
                messages.push(HyperbolicChatMessage::System {
                    content,
                    cache_control: message_cache,
                });
            }

            MessageRole::User => messages.push(convert_user_message(message, message_cache)?),

            MessageRole::Assistant => {
                let mut text = String::new();
                let mut tool_calls = Vec::new();

                for part in message.content.parts() {
                    match part {
                        ContentPart::Text { text: t, .. } => text.push_str(&t),
                        ContentPart::ToolCall {
                            tool_call_id,
                            tool_name,
                            args,
                            ..
                        } => tool_calls.push(HyperbolicToolCall {
                            id: tool_call_id,
                            call_type: "function".to_string(),
                            function: HyperbolicFunctionCall {
                                name: tool_name,
                                arguments: serde_json::to_string(&args)?,
                            },
                        }),
                        // Not representable on the wire.
                        ContentPart::Reasoning { .. } | ContentPart::RedactedReasoning { .. } => {}
                        other => return Err(unsupported_part(&other, message.role)),
                    }
                }

                messages.push(HyperbolicChatMessage::Assistant {
                    content: text,
                    tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
                    prefix: false,
                    cache_control: message_cache,
                });
            }

            MessageRole::Tool => {
                for part in message.content.parts() {
                    match &part {
                        ContentPart::ToolResult {
                            tool_call_id,
                            result,
                            ..
                        } => messages.push(HyperbolicChatMessage::Tool {
                            content: serde_json::to_string(result)?,
                            tool_call_id: tool_call_id.clone(),
                            cache_control: get_cache_control(part.provider_metadata())
                                .or_else(|| message_cache.clone()),
                        }),
                        other => return Err(unsupported_part(other, message.role)),
                    }
                }
            }

            MessageRole::Developer => {
                return Err(LlmError::UnsupportedOperation(format!(
                    "Unsupported role: {}",
                    message.role.as_str()
                )));
            }
        }
    }

    if let Some(HyperbolicChatMessage::Assistant { prefix, .. }) = messages.last_mut() {
        *prefix = true;
    }

    Ok(messages)
}

/// Text of the prompt's final message when it is an assistant message.
pub fn trailing_assistant_text(prompt: &[ChatMessage]) -> Option<String> {
    prompt
        .last()
        .filter(|message| message.role == MessageRole::Assistant)
        .map(|message| message.content.text())
}

fn convert_user_message(
    message: &ChatMessage,
    message_cache: Option<CacheControl>,
) -> Result<HyperbolicChatMessage, LlmError> {
    let parts = message.content.parts();

    if let [ContentPart::Text { text, .. }] = parts.as_slice() {
        return Ok(HyperbolicChatMessage::User {
            content: UserContent::Text(text.clone()),
            cache_control: get_cache_control(parts[0].provider_metadata()).or(message_cache),
        });
    }

    let mut wire_parts = Vec::with_capacity(parts.len());
    for part in &parts {
        let part_cache = get_cache_control(part.provider_metadata());
        let wire = match part {
            ContentPart::Text { text, .. } => UserContentPart::Text {
                text: text.clone(),
                cache_control: part_cache,
            },
            ContentPart::Image {
                image, mime_type, ..
            } => {
                let url = match image {
                    ImageData::Url(url) => url.clone(),
                    ImageData::Bytes(bytes) => format!(
                        "data:{};base64,{}",
                        mime_type.as_deref().unwrap_or(DEFAULT_IMAGE_MIME_TYPE),
                        BASE64_STANDARD.encode(bytes)
                    ),
                };
                UserContentPart::ImageUrl {
                    image_url: ImageUrl { url },
                    cache_control: part_cache.or_else(|| message_cache.clone()),
                }
            }
            ContentPart::File { data, .. } => UserContentPart::Text {
                text: match data {
                    FileData::Url(url) => url.clone(),
                    FileData::Data(raw) => raw.clone(),
                },
                cache_control: part_cache.or_else(|| message_cache.clone()),
            },
            other => return Err(unsupported_part(other, message.role)),
        };
        wire_parts.push(wire);
    }

    Ok(HyperbolicChatMessage::User {
        content: UserContent::Parts(wire_parts),
        cache_control: None,
    })
}

/// Convert a canonical prompt into the text prompt of `/completions`.
///
/// A bare prompt (one user message with one text part) is sent verbatim.
/// Anything else is rendered as a `user:` / `assistant:` transcript that
/// ends with an open `assistant:` turn.
pub fn convert_to_completion_prompt(
    prompt: &[ChatMessage],
    input_format: InputFormat,
) -> Result<String, LlmError> {
    if input_format == InputFormat::Prompt
        && let [message] = prompt
        && message.role == MessageRole::User
    {
        let parts = message.content.parts();
        if let [ContentPart::Text { text, .. }] = parts.as_slice() {
            return Ok(text.clone());
        }
    }

    let mut text = String::new();
    let mut rest = prompt;

    if let Some((first, tail)) = prompt.split_first()
        && first.role == MessageRole::System
    {
        text.push_str(&first.content.text());
        text.push_str("\n\n");
        rest = tail;
    }

    for message in rest {
        match message.role {
            MessageRole::System => {
                return Err(LlmError::InvalidPrompt(format!(
                    "Unexpected system message in prompt: {}",
                    message.content.text()
                )));
            }
            MessageRole::User => {
                let mut user_text = String::new();
                for part in message.content.parts() {
                    match part {
                        ContentPart::Text { text: t, .. } => user_text.push_str(&t),
                        ContentPart::Image { .. } => {
                            return Err(LlmError::UnsupportedOperation(
                                "images are not supported by completion models".to_string(),
                            ));
                        }
                        other => return Err(unsupported_part(&other, message.role)),
                    }
                }
                text.push_str(&format!("user:\n{user_text}\n\n"));
            }
            MessageRole::Assistant => {
                let mut assistant_text = String::new();
                for part in message.content.parts() {
                    match part {
                        ContentPart::Text { text: t, .. } => assistant_text.push_str(&t),
                        ContentPart::ToolCall { .. } => {
                            return Err(LlmError::UnsupportedOperation(
                                "tool-call messages are not supported by completion models"
                                    .to_string(),
                            ));
                        }
                        ContentPart::Reasoning { .. } | ContentPart::RedactedReasoning { .. } => {}
                        other => return Err(unsupported_part(&other, message.role)),
                    }
                }
                text.push_str(&format!("assistant:\n{assistant_text}\n\n"));
            }
            MessageRole::Tool => {
                return Err(LlmError::UnsupportedOperation(
                    "tool messages are not supported by completion models".to_string(),
                ));
            }
            MessageRole::Developer => {
                return Err(LlmError::UnsupportedOperation(
                    "Unsupported role: developer".to_string(),
                ));
            }
        }
    }

    text.push_str("assistant:\n");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn anthropic_cache() -> ProviderMetadata {
        let mut meta = ProviderMetadata::new();
        meta.insert(
            "anthropic".into(),
            json!({"cacheControl": {"type": "ephemeral"}}),
        );
        meta
    }

    fn to_json(messages: &[HyperbolicChatMessage]) -> serde_json::Value {
        serde_json::to_value(messages).unwrap()
    }

    #[test]
    fn single_text_user_message_collapses_to_string() {
        let out = convert_to_hyperbolic_chat_messages(&[ChatMessage::user("Hello")]).unwrap();
        assert_eq!(to_json(&out), json!([{"role": "user", "content": "Hello"}]));
    }

    #[test]
    fn image_bytes_become_data_uri_with_default_mime() {
        let prompt = [ChatMessage::user_parts(vec![
            ContentPart::text("Hello"),
            ContentPart::image_bytes(vec![0, 1, 2, 3], None),
        ])];
        let out = convert_to_hyperbolic_chat_messages(&prompt).unwrap();
        assert_eq!(
            to_json(&out),
            json!([{
                "role": "user",
                "content": [
                    {"type": "text", "text": "Hello"},
                    {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,AAECAw=="}}
                ]
            }])
        );
    }

    #[test]
    fn image_urls_pass_through_and_mime_is_respected() {
        let prompt = [ChatMessage::user_parts(vec![
            ContentPart::image_url("https://example.com/cat.png"),
            ContentPart::image_bytes(vec![0], Some("image/png".into())),
        ])];
        let out = to_json(&convert_to_hyperbolic_chat_messages(&prompt).unwrap());
        assert_eq!(
            out[0]["content"][0]["image_url"]["url"],
            "https://example.com/cat.png"
        );
        assert_eq!(out[0]["content"][1]["image_url"]["url"], "data:image/png;base64,AA==");
    }

    #[test]
    fn file_parts_become_text() {
        let prompt = [ChatMessage::user_parts(vec![
            ContentPart::file_url("https://example.com/a.pdf", "application/pdf"),
            ContentPart::File {
                data: FileData::Data("raw-data".into()),
                mime_type: "text/plain".into(),
                provider_metadata: None,
            },
        ])];
        let out = to_json(&convert_to_hyperbolic_chat_messages(&prompt).unwrap());
        assert_eq!(
            out[0]["content"],
            json!([
                {"type": "text", "text": "https://example.com/a.pdf"},
                {"type": "text", "text": "raw-data"}
            ])
        );
    }

    #[test]
    fn cache_control_resolution_per_part_kind() {
        let prompt = [ChatMessage::user_parts(vec![
            ContentPart::text("plain"),
            ContentPart::image_url("https://example.com/x.png"),
        ])
        .with_provider_metadata(anthropic_cache())];
        let out = to_json(&convert_to_hyperbolic_chat_messages(&prompt).unwrap());
        // text parts never inherit the message-level hint
        assert!(out[0]["content"][0].get("cache_control").is_none());
        assert_eq!(
            out[0]["content"][1]["cache_control"],
            json!({"type": "ephemeral"})
        );
        assert!(out[0].get("cache_control").is_none());
    }

    #[test]
    fn single_text_part_uses_part_then_message_cache_control() {
        let mut snake = ProviderMetadata::new();
        snake.insert(
            "anthropic".into(),
            json!({"cache_control": {"type": "ephemeral"}}),
        );
        let prompt = [ChatMessage::user_parts(vec![
            ContentPart::text("hi").with_provider_metadata(snake),
        ])];
        let out = to_json(&convert_to_hyperbolic_chat_messages(&prompt).unwrap());
        assert_eq!(out[0]["cache_control"], json!({"type": "ephemeral"}));

        let prompt = [ChatMessage::user("hi").with_provider_metadata(anthropic_cache())];
        let out = to_json(&convert_to_hyperbolic_chat_messages(&prompt).unwrap());
        assert_eq!(out[0]["cache_control"], json!({"type": "ephemeral"}));
    }

    #[test]
    fn system_message_keeps_cache_control() {
        let prompt = [
            ChatMessage::system("be brief").with_provider_metadata(anthropic_cache()),
            ChatMessage::user("hi"),
        ];
        let out = to_json(&convert_to_hyperbolic_chat_messages(&prompt).unwrap());
        assert_eq!(
            out[0],
            json!({"role": "system", "content": "be brief", "cache_control": {"type": "ephemeral"}})
        );
    }

    #[test]
    fn assistant_tool_calls_and_trailing_prefix() {
        let prompt = [
            ChatMessage::user("weather?"),
            ChatMessage::assistant_parts(vec![
                ContentPart::reasoning("thinking..."),
                ContentPart::text("Let me check. "),
                ContentPart::tool_call("call-1", "weather", json!({"city": "Paris"})),
            ]),
        ];
        let out = to_json(&convert_to_hyperbolic_chat_messages(&prompt).unwrap());
        assert_eq!(
            out[1],
            json!({
                "role": "assistant",
                "content": "Let me check. ",
                "tool_calls": [{
                    "id": "call-1",
                    "type": "function",
                    "function": {"name": "weather", "arguments": "{\"city\":\"Paris\"}"}
                }],
                "prefix": true
            })
        );
    }

    #[test]
    fn assistant_without_tool_calls_omits_field() {
        let prompt = [
            ChatMessage::assistant("hi"),
            ChatMessage::user("again"),
        ];
        let out = to_json(&convert_to_hyperbolic_chat_messages(&prompt).unwrap());
        assert_eq!(out[0], json!({"role": "assistant", "content": "hi"}));
    }

    #[test]
    fn tool_results_expand_into_one_message_each() {
        let prompt = [ChatMessage::tool_results(vec![
            ContentPart::tool_result("a", "f", json!({"ok": true})),
            ContentPart::tool_result("b", "f", json!("done")),
        ])];
        let out = to_json(&convert_to_hyperbolic_chat_messages(&prompt).unwrap());
        assert_eq!(
            out,
            json!([
                {"role": "tool", "content": "{\"ok\":true}", "tool_call_id": "a"},
                {"role": "tool", "content": "\"done\"", "tool_call_id": "b"}
            ])
        );
    }

    #[test]
    fn developer_role_is_rejected() {
        let prompt = [ChatMessage::new(
            MessageRole::Developer,
            MessageContent::Text("x".into()),
        )];
        let err = convert_to_hyperbolic_chat_messages(&prompt).unwrap_err();
        assert!(err.to_string().contains("Unsupported role"));
    }

    #[test]
    fn illegal_part_for_role_is_rejected() {
        let prompt = [ChatMessage::user_parts(vec![
            ContentPart::text("a"),
            ContentPart::tool_call("c", "f", json!({})),
        ])];
        let err = convert_to_hyperbolic_chat_messages(&prompt).unwrap_err();
        assert!(err.to_string().contains("Unsupported content part"));
    }

    #[test]
    fn completion_prompt_passes_bare_prompt_through() {
        let prompt = [ChatMessage::user("Say hi")];
        assert_eq!(
            convert_to_completion_prompt(&prompt, InputFormat::Prompt).unwrap(),
            "Say hi"
        );
    }

    #[test]
    fn completion_prompt_renders_transcript() {
        let prompt = [
            ChatMessage::system("You are terse."),
            ChatMessage::user("Hi"),
            ChatMessage::assistant("Hello"),
            ChatMessage::user("Bye"),
        ];
        assert_eq!(
            convert_to_completion_prompt(&prompt, InputFormat::Messages).unwrap(),
            "You are terse.\n\nuser:\nHi\n\nassistant:\nHello\n\nuser:\nBye\n\nassistant:\n"
        );
    }

    #[test]
    fn completion_prompt_rejects_late_system_and_tools() {
        let late_system = [ChatMessage::user("Hi"), ChatMessage::system("nope")];
        assert!(matches!(
            convert_to_completion_prompt(&late_system, InputFormat::Messages),
            Err(LlmError::InvalidPrompt(_))
        ));

        let tool = [ChatMessage::tool_results(vec![ContentPart::tool_result(
            "a",
            "f",
            json!(1),
        )])];
        assert!(matches!(
            convert_to_completion_prompt(&tool, InputFormat::Messages),
            Err(LlmError::UnsupportedOperation(_))
        ));

        let image = [ChatMessage::user_parts(vec![ContentPart::image_url("u")])];
        assert!(matches!(
            convert_to_completion_prompt(&image, InputFormat::Messages),
            Err(LlmError::UnsupportedOperation(_))
        ));
    }
}
