//! Test fixtures utilities: load SSE streaming chunks and drive converters

use futures_util::StreamExt;
use hyperbolic_provider::error::LlmError;
use hyperbolic_provider::stream::ChatStreamEvent;
use hyperbolic_provider::utils::streaming::{SseEventConverter, StreamFactory};
use std::io;

/// Absolute path of a file under `tests/fixtures`.
pub fn fixture_path(relative: &str) -> String {
    format!("{}/tests/fixtures/{relative}", env!("CARGO_MANIFEST_DIR"))
}

/// Load an `.sse` fixture file and split it into SSE events (separated by blank lines), returning a byte stream
pub fn load_sse_fixture_as_bytes(path: &str) -> io::Result<Vec<Result<Vec<u8>, io::Error>>> {
    let raw = std::fs::read_to_string(path)?;
    let normalized = raw.replace("\r\n", "\n");
    let mut out = Vec::new();
    for chunk in normalized.split("\n\n") {
        let s = chunk.trim_end_matches('\n');
        if s.is_empty() {
            continue;
        }
        let mut owned = String::from(s);
        owned.push_str("\n\n");
        out.push(Ok(owned.into_bytes()));
    }
    Ok(out)
}

/// Run a byte stream through the converter exactly as a live response would be
pub async fn collect_sse_events<C>(
    bytes: Vec<Result<Vec<u8>, io::Error>>,
    converter: C,
) -> Vec<Result<ChatStreamEvent, LlmError>>
where
    C: SseEventConverter + 'static,
{
    let byte_stream = futures_util::stream::iter(bytes);
    StreamFactory::from_byte_stream(byte_stream, converter, None)
        .collect()
        .await
}
