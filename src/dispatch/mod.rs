//! Message dispatcher
//!
//! One call to [`Dispatcher::send_message`] is one send cycle: the user's
//! message and a "..." placeholder go into the store straight away, the reply
//! is fetched (streamed token by token, or in one piece), and the store ends
//! up with either the reply or an `error` string. Failures never escape the
//! call; they are reported through [`SendOutcome`] and the store.

mod stream;

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::ConversationClient;
use crate::config::ClientConfig;
use crate::error::{ChatError, ChatResult, NetworkError};
use crate::models::{ConversationId, Message, MessageId};
use crate::store::{ConversationStore, StatePatch, StoreAction};
use crate::traits::HttpClient;

pub use stream::StreamEnd;

/// Per-send transport options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamData {
    pub use_streaming: bool,
}

impl StreamData {
    pub fn streaming() -> Self {
        Self { use_streaming: true }
    }

    pub fn buffered() -> Self {
        Self {
            use_streaming: false,
        }
    }
}

impl From<&ClientConfig> for StreamData {
    fn from(config: &ClientConfig) -> Self {
        Self {
            use_streaming: config.use_streaming,
        }
    }
}

/// How a send cycle ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The non-streaming reply was inserted
    Completed { message_id: MessageId },
    /// The streamed reply was finalized
    Streamed {
        message_id: MessageId,
        /// True if the server sent `[DONE]`, false if the body just ended
        finished_by_sentinel: bool,
    },
    /// The caller cancelled the send
    Cancelled,
    /// The send failed; `error` is what the store now shows
    Failed { error: String },
}

impl SendOutcome {
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            SendOutcome::Completed { .. } | SendOutcome::Streamed { .. }
        )
    }
}

/// Successful end of a send, before the store flags are settled
enum Reply {
    Buffered(MessageId),
    Streamed(MessageId, StreamEnd),
}

/// Sends user messages and reconciles the conversation store with the reply.
pub struct Dispatcher<C: HttpClient> {
    client: ConversationClient<C>,
    store: ConversationStore,
    idle_timeout: Option<Duration>,
}

impl<C: HttpClient> Dispatcher<C> {
    pub fn new(client: ConversationClient<C>, store: ConversationStore) -> Self {
        Self {
            client,
            store,
            idle_timeout: None,
        }
    }

    /// Build the client and dispatcher from one config
    pub fn from_config(http: C, store: ConversationStore, config: &ClientConfig) -> Self {
        Self::new(ConversationClient::new(http, config), store).with_idle_timeout(config.idle_timeout())
    }

    /// Abort a stream that goes quiet for longer than `timeout`
    pub fn with_idle_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn client(&self) -> &ConversationClient<C> {
        &self.client
    }

    /// Run one send cycle to completion.
    pub async fn send_message(&self, message: Message, stream_data: StreamData) -> SendOutcome {
        self.send_message_with_cancel(message, stream_data, CancellationToken::new())
            .await
    }

    /// Run one send cycle that stops early once `cancel` fires.
    pub async fn send_message_with_cancel(
        &self,
        message: Message,
        stream_data: StreamData,
        cancel: CancellationToken,
    ) -> SendOutcome {
        match self.dispatch(message, stream_data, &cancel).await {
            Ok(Reply::Buffered(message_id)) => {
                self.store.set(StatePatch::new().error("").loading(false));
                tracing::info!("Reply {} received", message_id);
                SendOutcome::Completed { message_id }
            }
            Ok(Reply::Streamed(message_id, StreamEnd::Sentinel)) => {
                // [DONE] only clears loading; a stale error stays visible
                self.store.set(StatePatch::new().loading(false));
                tracing::info!("Reply {} streamed", message_id);
                SendOutcome::Streamed {
                    message_id,
                    finished_by_sentinel: true,
                }
            }
            Ok(Reply::Streamed(message_id, StreamEnd::Exhausted)) => {
                self.store.set(StatePatch::new().error("").loading(false));
                tracing::info!("Reply {} streamed, body ended without [DONE]", message_id);
                SendOutcome::Streamed {
                    message_id,
                    finished_by_sentinel: false,
                }
            }
            Err(err) => {
                let error = err.user_message();
                self.store
                    .set(StatePatch::new().error(error.clone()).loading(false));

                if err.is_cancelled() {
                    tracing::info!("Send cancelled");
                    SendOutcome::Cancelled
                } else {
                    tracing::error!("Send failed [{}]: {}", err.error_code(), err);
                    SendOutcome::Failed { error }
                }
            }
        }
    }

    async fn dispatch(
        &self,
        message: Message,
        stream_data: StreamData,
        cancel: &CancellationToken,
    ) -> ChatResult<Reply> {
        let conversation_id = self.store.read(|state| state.active_conversation_id.clone());

        self.store.set(StatePatch::new().loading(true));

        let conversation_id = conversation_id.ok_or(ChatError::NoActiveConversation)?;
        let pending_id = MessageId::local();
        let content = message.content.clone();

        tracing::debug!(
            "Sending message {} to conversation {} (streaming: {})",
            message.id,
            conversation_id,
            stream_data.use_streaming
        );
        self.store.dispatch(StoreAction::InsertMessages {
            conversation_id: conversation_id.clone(),
            messages: vec![message, Message::pending(pending_id.clone())],
        });

        if stream_data.use_streaming {
            let (message_id, end) = self
                .stream_reply(&conversation_id, pending_id, &content, cancel)
                .await?;
            Ok(Reply::Streamed(message_id, end))
        } else {
            let message_id = self
                .fetch_reply(&conversation_id, pending_id, &content, cancel)
                .await?;
            Ok(Reply::Buffered(message_id))
        }
    }

    /// Non-streaming fallback: one request, one reply.
    ///
    /// On failure the placeholder stays where it is.
    async fn fetch_reply(
        &self,
        conversation_id: &ConversationId,
        pending_id: MessageId,
        content: &str,
        cancel: &CancellationToken,
    ) -> ChatResult<MessageId> {
        let reply = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(NetworkError::Cancelled.into()),
            reply = self.client.post_message(conversation_id, content) => reply?,
        };

        let message_id = reply.id.clone();
        self.store.dispatch(StoreAction::SwapMessage {
            conversation_id: conversation_id.clone(),
            remove: pending_id,
            insert: reply,
        });
        Ok(message_id)
    }
}
