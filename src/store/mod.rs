//! Conversation store
//!
//! Holds the conversations, the active selection and the `loading`/`error`
//! flags observed by the chat view. The store has a single writer: every
//! mutation is a [`StoreAction`] applied atomically through a
//! `tokio::sync::watch` channel, and observers are woken only when an action
//! actually changed something.

mod action;
mod conversation;
mod message;
mod state;

use std::sync::Arc;

use tokio::sync::watch;

use crate::models::{Conversation, ConversationId, Message, MessageId};

pub use action::StoreAction;
pub use state::{StatePatch, StoreState};

/// Shared handle to the conversation store. Clones share the same state.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    tx: Arc<watch::Sender<StoreState>>,
}

impl ConversationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::with_state(StoreState::default())
    }

    /// Create a store seeded with an initial state
    pub fn with_state(state: StoreState) -> Self {
        let (tx, _rx) = watch::channel(state);
        Self { tx: Arc::new(tx) }
    }

    /// Create a store holding one empty conversation, already active
    pub fn with_active_conversation(id: impl Into<ConversationId>) -> Self {
        let id = id.into();
        let store = Self::new();
        store.dispatch(StoreAction::UpsertConversation(Conversation::new(id.clone())));
        store.dispatch(StoreAction::SetActiveConversation(Some(id)));
        store
    }

    /// Current state snapshot
    pub fn get(&self) -> StoreState {
        self.tx.borrow().clone()
    }

    /// Read from the current state without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&StoreState) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Shallow-merge a partial state
    pub fn set(&self, patch: StatePatch) {
        self.dispatch(StoreAction::Patch(patch));
    }

    /// Apply an action atomically. Returns true if observers were notified.
    pub fn dispatch(&self, action: StoreAction) -> bool {
        let name = action.name();
        let changed = self.tx.send_if_modified(|state| state.apply(action));
        tracing::trace!(action = name, changed, "store dispatch");
        changed
    }

    /// Subscribe to state changes
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.tx.subscribe()
    }

    pub fn insert_message_to_active(&self, message: Message) -> bool {
        self.dispatch(StoreAction::InsertMessageToActive(message))
    }

    pub fn remove_message_from_active(&self, message_id: MessageId) -> bool {
        self.dispatch(StoreAction::RemoveMessageFromActive(message_id))
    }

    /// Replace a message of the active conversation wholesale.
    ///
    /// Callers pass the complete message; nothing is merged.
    pub fn update_message_in_active(&self, message_id: MessageId, message: Message) -> bool {
        self.dispatch(StoreAction::UpdateMessageInActive { message_id, message })
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}
