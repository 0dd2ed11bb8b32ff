//! Unified error type for a send cycle.

use thiserror::Error;

use super::network::NetworkError;
use super::stream::StreamError;
use crate::traits::HttpError;

/// Everything that can fail while dispatching a message.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Network-related errors (connections, HTTP status, timeouts).
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Errors while consuming the reply stream.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// The non-streaming response was not a message.
    #[error("Invalid message in response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("No active conversation")]
    NoActiveConversation,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ChatError {
    /// Normalized message suitable for the store's `error` field.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Network(err) => err.user_message(),
            ChatError::Stream(err) => err.user_message(),
            ChatError::Decode(_) => {
                "Received an invalid response from the server. Please try again.".to_string()
            }
            ChatError::NoActiveConversation => {
                "No conversation is selected. Open a conversation and try again.".to_string()
            }
            ChatError::Config(message) => format!("Configuration error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::Network(err) => err.error_code(),
            ChatError::Stream(err) => err.error_code(),
            ChatError::Decode(_) => "E_DECODE",
            ChatError::NoActiveConversation => "E_NO_CONVERSATION",
            ChatError::Config(_) => "E_CONFIG",
        }
    }

    /// Whether the send was stopped by the caller rather than failing.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            ChatError::Stream(StreamError::Cancelled) | ChatError::Network(NetworkError::Cancelled)
        )
    }
}

impl From<HttpError> for ChatError {
    fn from(err: HttpError) -> Self {
        ChatError::Network(err.into())
    }
}
