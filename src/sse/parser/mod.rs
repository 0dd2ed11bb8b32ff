//! SSE line and payload parsing
//!
//! Stateless functions; the chunk-level state lives in `SseDecoder`.

use serde_json::Value;

use crate::sse::events::{SseEvent, SseLine, SseParseError};

/// Literal prefix of a data line. The space is part of the match.
pub const DATA_PREFIX: &str = "data: ";

/// Payload that terminates the reply stream
pub const DONE_SENTINEL: &str = "[DONE]";

/// Parse a single SSE line into its component type
pub fn parse_sse_line(line: &str) -> SseLine {
    if let Some(rest) = line.strip_prefix(DATA_PREFIX) {
        return SseLine::Data(rest.trim().to_string());
    }

    if line.trim().is_empty() {
        return SseLine::Empty;
    }

    if let Some(stripped) = line.strip_prefix(':') {
        return SseLine::Comment(stripped.trim().to_string());
    }

    SseLine::Other(line.to_string())
}

/// Interpret the payload of a `data: ` line.
///
/// Returns:
/// - `Ok(Some(event))` for `[DONE]` or a `token` frame
/// - `Ok(None)` for well-formed JSON of any other shape, `error` frames included
/// - `Err(error)` if the payload is not JSON
pub fn parse_data_payload(data: &str) -> Result<Option<SseEvent>, SseParseError> {
    if data == DONE_SENTINEL {
        return Ok(Some(SseEvent::Done));
    }

    let json: Value = serde_json::from_str(data).map_err(|e| SseParseError::InvalidJson {
        data: data.to_string(),
        source: e.to_string(),
    })?;

    if let Some(token) = json.get("token").and_then(Value::as_str) {
        if token.is_empty() {
            return Ok(None);
        }
        return Ok(Some(SseEvent::Token(token.to_string())));
    }

    if let Some(message) = json.get("error").and_then(Value::as_str) {
        tracing::warn!("Server reported a stream error: {}", message);
    }

    Ok(None)
}
