// Integration tests for the conversation store: helper semantics and
// observer notification.

use chatsync::models::{Conversation, ConversationId, Message, MessageId, MessageRole};
use chatsync::store::{ConversationStore, StatePatch, StoreAction};

fn store_with_two_conversations() -> ConversationStore {
    let store = ConversationStore::with_active_conversation("a");
    store.dispatch(StoreAction::UpsertConversation(Conversation::new("b")));
    store
}

#[test]
fn test_helpers_target_active_conversation() {
    let store = store_with_two_conversations();
    let message = Message::user("to a");

    assert!(store.insert_message_to_active(message.clone()));
    store.dispatch(StoreAction::SetActiveConversation(Some("b".into())));
    assert!(store.insert_message_to_active(Message::user("to b")));

    let state = store.get();
    assert_eq!(state.messages(&ConversationId::from("a")).unwrap(), &[message]);
    assert_eq!(state.messages(&ConversationId::from("b")).unwrap().len(), 1);
}

#[test]
fn test_update_is_wholesale() {
    let store = ConversationStore::with_active_conversation("a");
    let shell = Message::streaming_shell(MessageId::local());
    store.insert_message_to_active(shell.clone());

    // A replacement with a different role and no timestamp is stored as given
    let replacement = Message {
        id: shell.id.clone(),
        role: MessageRole::User,
        content: "replaced".to_string(),
        is_streaming: false,
        timestamp: None,
    };
    assert!(store.update_message_in_active(shell.id.clone(), replacement.clone()));
    assert_eq!(store.get().active_messages().unwrap()[0], replacement);
}

#[test]
fn test_update_and_remove_missing_are_noops() {
    let store = ConversationStore::with_active_conversation("a");
    store.insert_message_to_active(Message::user("keep"));
    let before = store.get();

    assert!(!store.update_message_in_active(MessageId::Server(404), Message::user("x")));
    assert!(!store.remove_message_from_active(MessageId::local()));
    assert_eq!(store.get(), before);
}

#[test]
fn test_local_and_server_ids_never_collide() {
    let store = ConversationStore::with_active_conversation("a");
    let server = Message {
        id: MessageId::Server(1),
        ..Message::user("persisted")
    };
    store.insert_message_to_active(server);
    store.insert_message_to_active(Message::pending(MessageId::local()));

    let state = store.get();
    let messages = state.active_messages().unwrap();
    assert_eq!(messages.len(), 2);
    assert_ne!(messages[0].id, messages[1].id);
}

#[tokio::test]
async fn test_observer_sees_each_atomic_swap() {
    let store = ConversationStore::with_active_conversation("a");
    let mut rx = store.subscribe();
    let pending = Message::pending(MessageId::local());

    store.dispatch(StoreAction::InsertMessages {
        conversation_id: "a".into(),
        messages: vec![Message::user("q"), pending.clone()],
    });
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().active_messages().unwrap().len(), 2);

    let shell = Message::streaming_shell(MessageId::local());
    store.dispatch(StoreAction::SwapMessage {
        conversation_id: "a".into(),
        remove: pending.id.clone(),
        insert: shell.clone(),
    });
    rx.changed().await.unwrap();
    let state = rx.borrow_and_update().clone();
    let messages = state.active_messages().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].id, shell.id);
}

#[tokio::test]
async fn test_concurrent_writers_do_not_lose_updates() {
    let store = ConversationStore::with_active_conversation("a");

    let mut handles = Vec::new();
    for i in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            for j in 0..25 {
                store.insert_message_to_active(Message::user(format!("{}-{}", i, j)));
                tokio::task::yield_now().await;
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.get().active_messages().unwrap().len(), 200);
}

#[test]
fn test_set_is_shallow_merge() {
    let store = ConversationStore::with_active_conversation("a");
    store.set(StatePatch::new().loading(true));
    store.set(StatePatch::new().error("boom"));

    let state = store.get();
    assert!(state.loading);
    assert_eq!(state.error, "boom");
    assert_eq!(state.active_conversation_id, Some("a".into()));
}
