//! Streaming-related error types.
//!
//! Errors that end an SSE reply stream after the request was accepted.

use thiserror::Error;

/// Stream-specific error variants.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StreamError {
    /// The response had no readable body.
    #[error("Response body is not readable")]
    MissingBody,

    /// Stream connection was lost unexpectedly.
    #[error("Stream connection lost: {message}")]
    ConnectionLost { message: String },

    /// No bytes arrived within the idle timeout.
    #[error("Stream timeout after {duration_secs} seconds")]
    Timeout { duration_secs: u64 },

    /// The caller cancelled the stream.
    #[error("Stream cancelled")]
    Cancelled,
}

impl StreamError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::MissingBody => {
                "The server response could not be read as a stream.".to_string()
            }
            StreamError::ConnectionLost { .. } => {
                "Connection to the server was lost while the reply was streaming.".to_string()
            }
            StreamError::Timeout { duration_secs } => format!(
                "No response from server for {} seconds. The connection may have been lost.",
                duration_secs
            ),
            StreamError::Cancelled => "The reply was cancelled.".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::MissingBody => "E_STREAM_BODY",
            StreamError::ConnectionLost { .. } => "E_STREAM_CONN",
            StreamError::Timeout { .. } => "E_STREAM_TIMEOUT",
            StreamError::Cancelled => "E_STREAM_CANCEL",
        }
    }
}
