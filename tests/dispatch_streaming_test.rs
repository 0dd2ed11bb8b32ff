// Integration tests for the streaming send path: optimistic placeholder,
// token accumulation, finalization and failure cleanup.

mod common;

use std::time::Duration;

use bytes::Bytes;
use chatsync::dispatch::{SendOutcome, StreamData};
use chatsync::models::{Message, MessageRole, PENDING_CONTENT};
use chatsync::store::StatePatch;
use common::*;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_chunks_split_mid_line_produce_hel_bang() {
    let mock = MockHttpConfig::new()
        .with_sse(&[
            "data: {\"token\":\"Hel\"}\n",
            "lo",
            "\ndata: {\"token\":\"!\"}\n",
            "data: [DONE]\n",
        ])
        .build();
    let dispatcher = test_dispatcher(&mock);

    let outcome = dispatcher
        .send_message(Message::user("Hi"), StreamData::streaming())
        .await;
    assert!(outcome.is_success());

    let ai = ai_messages(dispatcher.store());
    assert_eq!(ai.len(), 1);
    assert_eq!(ai[0].content, "Hel!");
    assert!(!ai[0].is_streaming);
}

#[tokio::test]
async fn test_successful_stream_leaves_user_then_reply() {
    let mock = MockHttpConfig::new()
        .with_sse(&[&sse_body(&["Rust ", "is ", "fast."])])
        .build();
    let dispatcher = test_dispatcher(&mock);
    let user = Message::user("What is Rust?");

    dispatcher
        .send_message(user.clone(), StreamData::streaming())
        .await;

    let messages = active_messages(dispatcher.store());
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0], user);
    assert_eq!(messages[1].role, MessageRole::Ai);
    assert_eq!(messages[1].content, "Rust is fast.");
    assert!(messages[1].id.is_local());
    assert!(messages[1].timestamp.is_some());
    assert!(messages.iter().all(|m| !m.is_pending()));

    let state = dispatcher.store().get();
    assert!(!state.loading);
}

#[tokio::test]
async fn test_request_shape() {
    let mock = MockHttpConfig::new().with_sse(&["data: [DONE]\n"]).build();
    let dispatcher = test_dispatcher(&mock);

    dispatcher
        .send_message(Message::user("ping"), StreamData::streaming())
        .await;

    let requests = mock.get_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].url, stream_url());
    assert_eq!(requests[0].body.as_deref(), Some(r#"{"input":"ping"}"#));
}

#[tokio::test]
async fn test_done_stops_processing_rest_of_chunk() {
    let mock = MockHttpConfig::new()
        .with_sse(&[
            "data: {\"token\":\"kept\"}\ndata: [DONE]\ndata: {\"token\":\" dropped\"}\n",
            "data: {\"token\":\" also dropped\"}\n",
        ])
        .build();
    let dispatcher = test_dispatcher(&mock);

    let outcome = dispatcher
        .send_message(Message::user("q"), StreamData::streaming())
        .await;
    assert!(matches!(
        outcome,
        SendOutcome::Streamed {
            finished_by_sentinel: true,
            ..
        }
    ));
    assert_eq!(ai_messages(dispatcher.store())[0].content, "kept");
}

#[tokio::test]
async fn test_malformed_json_is_skipped() {
    let mock = MockHttpConfig::new()
        .with_sse(&[
            "data: {\"token\":\"a\"}\n",
            "data: {\"token\": oops}\n",
            "data: not json at all\n",
            "data: {\"token\":\"b\"}\n",
            "data: [DONE]\n",
        ])
        .build();
    let dispatcher = test_dispatcher(&mock);

    let outcome = dispatcher
        .send_message(Message::user("q"), StreamData::streaming())
        .await;
    assert!(outcome.is_success());
    assert_eq!(ai_messages(dispatcher.store())[0].content, "ab");
    assert!(dispatcher.store().get().error.is_empty());
}

#[tokio::test]
async fn test_non_token_frames_are_ignored() {
    let mock = MockHttpConfig::new()
        .with_sse(&[
            ": keep-alive\n",
            "event: token\n",
            "data: {\"usage\": {\"tokens\": 3}}\n",
            "data: {\"token\": \"\"}\n",
            "data:{\"token\":\"unspaced\"}\n",
            "data: {\"token\":\"only\"}\n\n",
            "data: [DONE]\n",
        ])
        .build();
    let dispatcher = test_dispatcher(&mock);

    dispatcher
        .send_message(Message::user("q"), StreamData::streaming())
        .await;
    assert_eq!(ai_messages(dispatcher.store())[0].content, "only");
}

#[tokio::test]
async fn test_stream_end_without_done_finalizes() {
    let mock = MockHttpConfig::new()
        .with_sse(&["data: {\"token\":\"no \"}\n", "data: {\"token\":\"sentinel\"}\n"])
        .build();
    let dispatcher = test_dispatcher(&mock);
    dispatcher.store().set(StatePatch::new().error("stale"));

    let outcome = dispatcher
        .send_message(Message::user("q"), StreamData::streaming())
        .await;
    assert!(matches!(
        outcome,
        SendOutcome::Streamed {
            finished_by_sentinel: false,
            ..
        }
    ));

    let ai = ai_messages(dispatcher.store());
    assert_eq!(ai[0].content, "no sentinel");
    assert!(!ai[0].is_streaming);

    // The shared tail clears the error on this path
    let state = dispatcher.store().get();
    assert!(state.error.is_empty());
    assert!(!state.loading);
}

#[tokio::test]
async fn test_server_error_frame_then_close_finalizes_partial_reply() {
    let mock = MockHttpConfig::new()
        .with_sse(&["data: {\"token\":\"Hel\"}\n\n", "data: {\"error\":\"boom\"}\n\n"])
        .build();
    let dispatcher = test_dispatcher(&mock);

    let outcome = dispatcher
        .send_message(Message::user("q"), StreamData::streaming())
        .await;
    assert!(matches!(
        outcome,
        SendOutcome::Streamed {
            finished_by_sentinel: false,
            ..
        }
    ));

    let ai = ai_messages(dispatcher.store());
    assert_eq!(ai.len(), 1);
    assert_eq!(ai[0].content, "Hel");
    assert!(!ai[0].is_streaming);
    assert!(dispatcher.store().get().error.is_empty());
}

#[tokio::test]
async fn test_done_path_keeps_stale_error() {
    let mock = MockHttpConfig::new().with_sse(&[&sse_body(&["ok"])]).build();
    let dispatcher = test_dispatcher(&mock);
    dispatcher.store().set(StatePatch::new().error("stale"));

    dispatcher
        .send_message(Message::user("q"), StreamData::streaming())
        .await;

    let state = dispatcher.store().get();
    assert_eq!(state.error, "stale");
    assert!(!state.loading);
}

#[tokio::test]
async fn test_http_500_sets_error_and_removes_ai_message() {
    let mock = MockHttpConfig::new()
        .with_response(
            &stream_url(),
            MockResponse::StreamWithStatus {
                status: 500,
                chunks: vec![Bytes::from("Internal Server Error")],
            },
        )
        .build();
    let dispatcher = test_dispatcher(&mock);

    let outcome = dispatcher
        .send_message(Message::user("q"), StreamData::streaming())
        .await;
    assert!(matches!(outcome, SendOutcome::Failed { ref error } if error.contains("500")));

    let state = dispatcher.store().get();
    assert!(state.error.contains("500"));
    assert!(!state.loading);
    assert!(ai_messages(dispatcher.store()).is_empty());

    // Only the user message survives: the placeholder was already swapped out
    let messages = active_messages(dispatcher.store());
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, MessageRole::User);
}

#[tokio::test]
async fn test_missing_body_fails() {
    let mock = MockHttpConfig::new()
        .with_response(&stream_url(), MockResponse::StreamWithoutBody { status: 200 })
        .build();
    let dispatcher = test_dispatcher(&mock);

    let outcome = dispatcher
        .send_message(Message::user("q"), StreamData::streaming())
        .await;
    assert!(matches!(outcome, SendOutcome::Failed { .. }));
    assert!(ai_messages(dispatcher.store()).is_empty());
}

#[tokio::test]
async fn test_connection_refused_fails_cleanly() {
    let mock = MockHttpConfig::new()
        .with_response(
            &stream_url(),
            MockResponse::Error(HttpError::ConnectionFailed("refused".to_string())),
        )
        .build();
    let dispatcher = test_dispatcher(&mock);

    let outcome = dispatcher
        .send_message(Message::user("q"), StreamData::streaming())
        .await;
    assert!(matches!(outcome, SendOutcome::Failed { .. }));

    let state = dispatcher.store().get();
    assert!(!state.error.is_empty());
    assert!(!state.loading);
}

#[tokio::test]
async fn test_observers_see_placeholder_then_growing_reply() {
    let mock = MockHttpConfig::new()
        .with_response(
            &stream_url(),
            MockResponse::StalledStream(vec![Bytes::from(token_line("first"))]),
        )
        .build();
    let dispatcher = test_dispatcher(&mock);
    let mut rx = dispatcher.store().subscribe();
    let cancel = CancellationToken::new();

    let send = dispatcher.send_message_with_cancel(
        Message::user("q"),
        StreamData::streaming(),
        cancel.clone(),
    );
    let observe = async {
        // Wait until the first token is visible, then stop the send
        loop {
            rx.changed().await.unwrap();
            let state = rx.borrow_and_update().clone();
            let messages = state.active_messages().unwrap();
            assert!(state.loading);
            if let Some(reply) = messages.iter().find(|m| m.role == MessageRole::Ai) {
                assert!(messages.iter().all(|m| m.content != PENDING_CONTENT));
                if reply.content == "first" {
                    assert!(reply.is_streaming);
                    break;
                }
            }
        }
        cancel.cancel();
    };

    let (outcome, ()) = tokio::join!(send, observe);
    assert_eq!(outcome, SendOutcome::Cancelled);

    let state = dispatcher.store().get();
    assert!(!state.loading);
    assert!(ai_messages(dispatcher.store()).is_empty());
}

#[tokio::test]
async fn test_idle_timeout_aborts_stalled_stream() {
    let mock = MockHttpConfig::new()
        .with_response(&stream_url(), MockResponse::StalledStream(vec![]))
        .build();
    let dispatcher = test_dispatcher(&mock).with_idle_timeout(Some(Duration::from_millis(20)));

    let outcome = dispatcher
        .send_message(Message::user("q"), StreamData::streaming())
        .await;
    assert!(matches!(outcome, SendOutcome::Failed { .. }));
    assert!(ai_messages(dispatcher.store()).is_empty());
}

#[tokio::test]
async fn test_multibyte_split_across_chunks() {
    let body = sse_body(&["naïve café 🦀"]).into_bytes();
    // Split inside every multi-byte character
    let chunks: Vec<Vec<u8>> = body.chunks(1).map(|c| c.to_vec()).collect();
    let mock = MockHttpConfig::new().with_sse_bytes(chunks).build();
    let dispatcher = test_dispatcher(&mock);

    dispatcher
        .send_message(Message::user("q"), StreamData::streaming())
        .await;
    assert_eq!(ai_messages(dispatcher.store())[0].content, "naïve café 🦀");
}
