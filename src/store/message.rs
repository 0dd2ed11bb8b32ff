//! Message repository helpers for StoreState

use crate::models::{ConversationId, Message, MessageId};

use super::StoreState;

impl StoreState {
    /// Messages of a conversation, if it is known
    pub fn messages(&self, conversation_id: &ConversationId) -> Option<&[Message]> {
        self.conversation(conversation_id)
            .map(|c| c.messages.as_slice())
    }

    /// Messages of the active conversation
    pub fn active_messages(&self) -> Option<&[Message]> {
        self.active_conversation().map(|c| c.messages.as_slice())
    }

    /// Append a message to a conversation.
    ///
    /// Ids stay unique within a list: a message whose id is already present
    /// replaces the existing entry in place instead of being appended.
    pub fn insert_message(&mut self, conversation_id: &ConversationId, message: Message) -> bool {
        let Some(conversation) = self.conversation_mut(conversation_id) else {
            tracing::debug!("insert skipped, unknown conversation {}", conversation_id);
            return false;
        };

        match conversation.position(&message.id) {
            Some(index) => {
                tracing::debug!("message {} already present, replacing", message.id);
                if conversation.messages[index] == message {
                    return false;
                }
                conversation.messages[index] = message;
            }
            None => conversation.messages.push(message),
        }
        true
    }

    /// Remove a message by id. No-op if it is not there.
    pub fn remove_message(&mut self, conversation_id: &ConversationId, message_id: MessageId) -> bool {
        let Some(conversation) = self.conversation_mut(conversation_id) else {
            return false;
        };

        let before = conversation.messages.len();
        conversation.messages.retain(|m| m.id != message_id);
        conversation.messages.len() != before
    }

    /// Replace a message wholesale, keeping its position.
    ///
    /// Silently does nothing when the conversation or the message id is unknown.
    pub fn update_message(
        &mut self,
        conversation_id: &ConversationId,
        message_id: MessageId,
        message: Message,
    ) -> bool {
        let Some(conversation) = self.conversation_mut(conversation_id) else {
            return false;
        };
        let Some(index) = conversation.position(&message_id) else {
            return false;
        };

        if conversation.messages[index] == message {
            return false;
        }
        conversation.messages[index] = message;
        true
    }

    pub fn insert_message_to_active(&mut self, message: Message) -> bool {
        match self.active_conversation_id.clone() {
            Some(id) => self.insert_message(&id, message),
            None => false,
        }
    }

    pub fn remove_message_from_active(&mut self, message_id: MessageId) -> bool {
        match self.active_conversation_id.clone() {
            Some(id) => self.remove_message(&id, message_id),
            None => false,
        }
    }

    pub fn update_message_in_active(&mut self, message_id: MessageId, message: Message) -> bool {
        match self.active_conversation_id.clone() {
            Some(id) => self.update_message(&id, message_id, message),
            None => false,
        }
    }
}
