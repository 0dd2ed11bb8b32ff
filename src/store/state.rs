//! Store state and the shallow-merge patch applied by `set`

use crate::models::{Conversation, ConversationId};

/// Snapshot of everything the chat view observes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    /// Known conversations, in display order
    pub conversations: Vec<Conversation>,
    /// The conversation new messages are sent to
    pub active_conversation_id: Option<ConversationId>,
    /// True while a send cycle is in flight
    pub loading: bool,
    /// User-facing error from the last failed send, empty when none
    pub error: String,
}

/// Partial state update. Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatePatch {
    pub conversations: Option<Vec<Conversation>>,
    pub active_conversation_id: Option<Option<ConversationId>>,
    pub loading: Option<bool>,
    pub error: Option<String>,
}

impl StatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = Some(loading);
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn conversations(mut self, conversations: Vec<Conversation>) -> Self {
        self.conversations = Some(conversations);
        self
    }

    pub fn active_conversation(mut self, id: Option<ConversationId>) -> Self {
        self.active_conversation_id = Some(id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_none()
            && self.active_conversation_id.is_none()
            && self.loading.is_none()
            && self.error.is_none()
    }
}

impl StoreState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow-merge a patch. Returns true if anything changed.
    pub fn merge(&mut self, patch: StatePatch) -> bool {
        let mut changed = false;

        if let Some(conversations) = patch.conversations {
            changed |= self.conversations != conversations;
            self.conversations = conversations;
        }
        if let Some(active) = patch.active_conversation_id {
            changed |= self.active_conversation_id != active;
            self.active_conversation_id = active;
        }
        if let Some(loading) = patch.loading {
            changed |= self.loading != loading;
            self.loading = loading;
        }
        if let Some(error) = patch.error {
            changed |= self.error != error;
            self.error = error;
        }

        changed
    }
}
