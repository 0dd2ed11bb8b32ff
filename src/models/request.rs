use serde::{Deserialize, Serialize};

/// Body of both the streaming and the non-streaming message endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendMessageRequest {
    /// The user's message text
    pub input: String,
}

impl SendMessageRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}
