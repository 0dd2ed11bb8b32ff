//! Store mutations expressed as intents.
//!
//! Every change to the store goes through a [`StoreAction`], applied whole by
//! the single writer in [`ConversationStore::dispatch`](super::ConversationStore::dispatch).
//! Multi-step edits that must never be observed half-done (inserting a message
//! together with its placeholder, swapping the placeholder for the reply shell)
//! are single actions.

use crate::models::{Conversation, ConversationId, Message, MessageId};

use super::{StatePatch, StoreState};

/// A serialized store mutation
#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    /// Shallow merge, the equivalent of `set(partial)`
    Patch(StatePatch),
    /// Add or replace a conversation
    UpsertConversation(Conversation),
    /// Change which conversation is active
    SetActiveConversation(Option<ConversationId>),
    /// Append messages to a conversation, in order
    InsertMessages {
        conversation_id: ConversationId,
        messages: Vec<Message>,
    },
    /// Remove a message by id
    RemoveMessage {
        conversation_id: ConversationId,
        message_id: MessageId,
    },
    /// Replace a message wholesale
    UpdateMessage {
        conversation_id: ConversationId,
        message_id: MessageId,
        message: Message,
    },
    /// Remove one message and append another in the same step
    SwapMessage {
        conversation_id: ConversationId,
        remove: MessageId,
        insert: Message,
    },
    InsertMessageToActive(Message),
    RemoveMessageFromActive(MessageId),
    UpdateMessageInActive {
        message_id: MessageId,
        message: Message,
    },
}

impl StoreAction {
    /// Short name for log lines
    pub fn name(&self) -> &'static str {
        match self {
            StoreAction::Patch(_) => "patch",
            StoreAction::UpsertConversation(_) => "upsert_conversation",
            StoreAction::SetActiveConversation(_) => "set_active_conversation",
            StoreAction::InsertMessages { .. } => "insert_messages",
            StoreAction::RemoveMessage { .. } => "remove_message",
            StoreAction::UpdateMessage { .. } => "update_message",
            StoreAction::SwapMessage { .. } => "swap_message",
            StoreAction::InsertMessageToActive(_) => "insert_message_to_active",
            StoreAction::RemoveMessageFromActive(_) => "remove_message_from_active",
            StoreAction::UpdateMessageInActive { .. } => "update_message_in_active",
        }
    }
}

impl StoreState {
    /// Apply an action. Returns true if the state changed.
    pub fn apply(&mut self, action: StoreAction) -> bool {
        match action {
            StoreAction::Patch(patch) => self.merge(patch),
            StoreAction::UpsertConversation(conversation) => self.upsert_conversation(conversation),
            StoreAction::SetActiveConversation(id) => self.set_active_conversation(id),
            StoreAction::InsertMessages {
                conversation_id,
                messages,
            } => messages
                .into_iter()
                .fold(false, |changed, m| self.insert_message(&conversation_id, m) | changed),
            StoreAction::RemoveMessage {
                conversation_id,
                message_id,
            } => self.remove_message(&conversation_id, message_id),
            StoreAction::UpdateMessage {
                conversation_id,
                message_id,
                message,
            } => self.update_message(&conversation_id, message_id, message),
            StoreAction::SwapMessage {
                conversation_id,
                remove,
                insert,
            } => {
                let removed = self.remove_message(&conversation_id, remove);
                self.insert_message(&conversation_id, insert) | removed
            }
            StoreAction::InsertMessageToActive(message) => self.insert_message_to_active(message),
            StoreAction::RemoveMessageFromActive(id) => self.remove_message_from_active(id),
            StoreAction::UpdateMessageInActive { message_id, message } => {
                self.update_message_in_active(message_id, message)
            }
        }
    }
}
