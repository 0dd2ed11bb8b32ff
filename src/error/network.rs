//! Network-related error types.
//!
//! Errors raised while reaching the backend: connections, timeouts and
//! non-2xx responses.

use thiserror::Error;

use crate::traits::HttpError;

/// Network-specific error variants.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NetworkError {
    /// Connection to the server failed.
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    /// Request timed out.
    #[error("Request timeout: {message}")]
    Timeout { message: String },

    /// HTTP status error (non-2xx response).
    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16, message: String },

    /// The request URL could not be built or parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Request was cancelled.
    #[error("Request cancelled")]
    Cancelled,

    /// Generic network error.
    #[error("Network error: {0}")]
    Other(String),
}

impl NetworkError {
    /// Get a user-friendly error message.
    ///
    /// HTTP status errors always mention the status code.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } => {
                "Unable to connect to the server. Please check that it is running.".to_string()
            }
            NetworkError::Timeout { .. } => {
                "The request timed out. The server may be slow or unreachable.".to_string()
            }
            NetworkError::HttpStatus { status, .. } => match *status {
                404 => format!("HTTP error! status: {} (conversation not found)", status),
                429 => format!("HTTP error! status: {} (too many requests)", status),
                500..=599 => format!(
                    "HTTP error! status: {} (the server is experiencing issues)",
                    status
                ),
                _ => format!("HTTP error! status: {}", status),
            },
            NetworkError::InvalidUrl(url) => format!("Invalid server URL: {}", url),
            NetworkError::Cancelled => "The request was cancelled.".to_string(),
            NetworkError::Other(message) => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::HttpStatus { .. } => "E_NET_HTTP",
            NetworkError::InvalidUrl(_) => "E_NET_URL",
            NetworkError::Cancelled => "E_NET_CANCEL",
            NetworkError::Other(_) => "E_NET_OTHER",
        }
    }
}

impl From<HttpError> for NetworkError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed { message },
            HttpError::Timeout(message) => NetworkError::Timeout { message },
            HttpError::ServerError { status, message } => {
                NetworkError::HttpStatus { status, message }
            }
            HttpError::Cancelled => NetworkError::Cancelled,
            HttpError::InvalidUrl(url) => NetworkError::InvalidUrl(url),
            HttpError::Io(message) | HttpError::Other(message) => NetworkError::Other(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mentions_code() {
        let err = NetworkError::HttpStatus {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error! status: 500");
        assert!(err.user_message().contains("500"));
        assert_eq!(err.error_code(), "E_NET_HTTP");

        let err = NetworkError::HttpStatus {
            status: 418,
            message: String::new(),
        };
        assert_eq!(err.user_message(), "HTTP error! status: 418");
    }

    #[test]
    fn test_from_http_error() {
        assert_eq!(
            NetworkError::from(HttpError::ConnectionFailed("refused".to_string())),
            NetworkError::ConnectionFailed {
                message: "refused".to_string()
            }
        );
        assert_eq!(
            NetworkError::from(HttpError::ServerError {
                status: 502,
                message: "bad gateway".to_string()
            }),
            NetworkError::HttpStatus {
                status: 502,
                message: "bad gateway".to_string()
            }
        );
        assert_eq!(NetworkError::from(HttpError::Cancelled), NetworkError::Cancelled);
        assert!(matches!(
            NetworkError::from(HttpError::Io("reset".to_string())),
            NetworkError::Other(_)
        ));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(NetworkError::Cancelled.error_code(), "E_NET_CANCEL");
        assert_eq!(
            NetworkError::InvalidUrl("x".to_string()).error_code(),
            "E_NET_URL"
        );
    }
}
