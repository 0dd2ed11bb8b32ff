//! Error handling for chatsync.
//!
//! - **Domain-specific Errors**: [`NetworkError`] for reaching the backend,
//!   [`StreamError`] for consuming the reply stream
//! - **Unified Error Type**: [`ChatError`] consolidates them
//! - **Result Type Alias**: [`ChatResult<T>`] for consistent return types
//!
//! Every variant has a `user_message()` (what ends up in the store's `error`
//! field) and an `error_code()` (what ends up in the logs).
//!
//! # Example
//!
//! ```ignore
//! use chatsync::error::{ChatError, ChatResult};
//!
//! match client.post_message(&conversation_id, "hi").await {
//!     Ok(message) => println!("{}", message.content),
//!     Err(err) => eprintln!("[{}] {}", err.error_code(), err.user_message()),
//! }
//! ```

mod chat_error;
mod network;
mod stream;

pub use chat_error::ChatError;
pub use network::NetworkError;
pub use stream::StreamError;

/// Type alias for Results using ChatError.
pub type ChatResult<T> = Result<T, ChatError>;
