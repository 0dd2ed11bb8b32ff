//! SSE (Server-Sent Events) reply stream decoding
//!
//! The backend streams an assistant reply as `data: ` lines:
//! - `data: {"token": "..."}` - next fragment of the reply
//! - `data: {"error": "..."}` - the backend failed mid-stream
//! - `data: [DONE]` - end of the reply
//!
//! Anything else (comments, `event:` fields, blank separators) is ignored.
//!
//! # Module structure
//! - `events` - Line and event types (SseLine, SseEvent, SseParseError)
//! - `parser` - Stateless line and payload parsing
//! - `decoder` - Chunk-level state (SseDecoder, Utf8StreamDecoder)

mod decoder;
mod events;
mod parser;

// Re-export public types
pub use decoder::{SseDecoder, Utf8StreamDecoder};
pub use events::{SseEvent, SseLine, SseParseError};
pub use parser::{parse_data_payload, parse_sse_line, DATA_PREFIX, DONE_SENTINEL};
