//! Conversation lookup and selection for StoreState

use crate::models::{Conversation, ConversationId};

use super::StoreState;

impl StoreState {
    /// Get a conversation by id
    pub fn conversation(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    pub(crate) fn conversation_mut(&mut self, id: &ConversationId) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| &c.id == id)
    }

    /// The conversation referenced by `active_conversation_id`
    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active_conversation_id
            .as_ref()
            .and_then(|id| self.conversation(id))
    }

    /// Insert a conversation, or replace the one with the same id
    pub fn upsert_conversation(&mut self, conversation: Conversation) -> bool {
        match self.conversation_mut(&conversation.id) {
            Some(existing) if *existing == conversation => false,
            Some(existing) => {
                *existing = conversation;
                true
            }
            None => {
                self.conversations.push(conversation);
                true
            }
        }
    }

    /// Select the active conversation. `None` clears the selection.
    pub fn set_active_conversation(&mut self, id: Option<ConversationId>) -> bool {
        if self.active_conversation_id == id {
            return false;
        }
        self.active_conversation_id = id;
        true
    }
}
