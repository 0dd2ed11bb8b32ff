//! Common test utilities for integration tests.
//!
//! Fixtures for stores, dispatchers and SSE bodies shared by the
//! integration tests.
//!
//! # Example
//!
//! ```ignore
//! let mock = MockHttpConfig::new().with_sse(&["data: [DONE]\n"]).build();
//! let dispatcher = test_dispatcher(&mock);
//! ```

#![allow(dead_code)]

pub mod mocks;

pub use mocks::*;

use chatsync::config::ClientConfig;
use chatsync::dispatch::Dispatcher;
use chatsync::models::{Message, MessageRole};
use chatsync::store::ConversationStore;

/// Conversation every fixture store starts with
pub const TEST_CONVERSATION: &str = "conv-1";

/// Creates a store holding one empty, active conversation.
pub fn test_store() -> ConversationStore {
    ConversationStore::with_active_conversation(TEST_CONVERSATION)
}

/// Creates a dispatcher on the default config over the given mock.
pub fn test_dispatcher(mock: &MockHttpClient) -> Dispatcher<MockHttpClient> {
    Dispatcher::from_config(mock.clone(), test_store(), &ClientConfig::default())
}

/// Streaming endpoint URL of the fixture conversation under the default config
pub fn stream_url() -> String {
    format!(
        "http://localhost:5000/api/conversations/{}/messages?stream=true",
        TEST_CONVERSATION
    )
}

/// Non-streaming endpoint URL of the fixture conversation under the default config
pub fn messages_url() -> String {
    format!(
        "http://localhost:5000/api/conversations/{}/messages",
        TEST_CONVERSATION
    )
}

/// Messages of the active conversation
pub fn active_messages(store: &ConversationStore) -> Vec<Message> {
    store.read(|state| state.active_messages().unwrap_or_default().to_vec())
}

/// AI messages of the active conversation
pub fn ai_messages(store: &ConversationStore) -> Vec<Message> {
    active_messages(store)
        .into_iter()
        .filter(|m| m.role == MessageRole::Ai)
        .collect()
}

/// A well-formed token line
pub fn token_line(token: &str) -> String {
    format!("data: {}\n", serde_json::json!({ "token": token }))
}

/// SSE body for a reply made of these tokens, ended by `[DONE]`
pub fn sse_body(tokens: &[&str]) -> String {
    let mut body: String = tokens.iter().map(|t| format!("{}\n", token_line(t))).collect();
    body.push_str("data: [DONE]\n\n");
    body
}
