//! SSE line and event types
//!
//! The reply stream carries one JSON object per `data: ` line and ends with
//! a `data: [DONE]` sentinel.

/// Represents a parsed SSE line
#[derive(Debug, Clone, PartialEq)]
pub enum SseLine {
    /// Payload of a `data: ` line, prefix stripped and trimmed
    Data(String),
    /// Empty line (event separator)
    Empty,
    /// Comment line (starts with ':')
    Comment(String),
    /// Any other field (`event:`, `id:`, `retry:`, unspaced `data:`), ignored
    Other(String),
}

/// Events decoded from `data: ` lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Next fragment of the assistant reply
    Token(String),
    /// The `[DONE]` sentinel: the reply is complete
    Done,
}

impl SseEvent {
    /// Get the event type name as a string
    pub fn event_type_name(&self) -> &'static str {
        match self {
            SseEvent::Token(_) => "token",
            SseEvent::Done => "done",
        }
    }
}

/// SSE parsing errors
#[derive(Debug, Clone, PartialEq)]
pub enum SseParseError {
    /// The data payload was not valid JSON
    InvalidJson { data: String, source: String },
}

impl std::fmt::Display for SseParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SseParseError::InvalidJson { data, source } => {
                write!(f, "Invalid JSON in data frame '{}': {}", data, source)
            }
        }
    }
}

impl std::error::Error for SseParseError {}
