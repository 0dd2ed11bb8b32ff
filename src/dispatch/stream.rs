//! Streaming reply path
//!
//! The placeholder is swapped for an empty AI message, and every decoded
//! token replaces that message with a copy carrying the accumulated content.
//! If anything fails after the swap, the AI message is removed again before
//! the error propagates.

use bytes::Bytes;
use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::error::{ChatResult, StreamError};
use crate::models::{ConversationId, Message, MessageId};
use crate::sse::{SseDecoder, SseEvent};
use crate::store::StoreAction;
use crate::traits::{ByteStream, HttpClient};

use super::Dispatcher;

/// How a reply stream finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The server sent `data: [DONE]`
    Sentinel,
    /// The body ended without a sentinel
    Exhausted,
}

impl<C: HttpClient> Dispatcher<C> {
    pub(super) async fn stream_reply(
        &self,
        conversation_id: &ConversationId,
        pending_id: MessageId,
        content: &str,
        cancel: &CancellationToken,
    ) -> ChatResult<(MessageId, StreamEnd)> {
        let shell = Message::streaming_shell(MessageId::local());
        let streaming_id = shell.id.clone();

        self.store.dispatch(StoreAction::SwapMessage {
            conversation_id: conversation_id.clone(),
            remove: pending_id,
            insert: shell.clone(),
        });

        match self.consume_stream(conversation_id, &shell, content, cancel).await {
            Ok(end) => Ok((streaming_id, end)),
            Err(err) => {
                tracing::error!("Streaming error [{}]: {}", err.error_code(), err);
                self.store.dispatch(StoreAction::RemoveMessage {
                    conversation_id: conversation_id.clone(),
                    message_id: streaming_id,
                });
                Err(err)
            }
        }
    }

    async fn consume_stream(
        &self,
        conversation_id: &ConversationId,
        shell: &Message,
        content: &str,
        cancel: &CancellationToken,
    ) -> ChatResult<StreamEnd> {
        let mut body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StreamError::Cancelled.into()),
            body = self.client.open_stream(conversation_id, content) => body?,
        };

        let mut decoder = SseDecoder::new();
        let mut accumulated = String::new();

        while let Some(chunk) = self.next_chunk(&mut body, cancel).await? {
            for event in decoder.decode(&chunk) {
                match event {
                    Ok(SseEvent::Token(token)) => {
                        accumulated.push_str(&token);
                        self.store.dispatch(StoreAction::UpdateMessage {
                            conversation_id: conversation_id.clone(),
                            message_id: shell.id.clone(),
                            message: shell.with_content(&accumulated),
                        });
                    }
                    Ok(SseEvent::Done) => {
                        self.finalize(conversation_id, shell, &accumulated);
                        return Ok(StreamEnd::Sentinel);
                    }
                    Err(e) => {
                        tracing::warn!("Skipping malformed stream frame: {}", e);
                    }
                }
            }
        }

        let tail = decoder.finish();
        if !tail.is_empty() {
            tracing::debug!("Discarding {} unterminated bytes at end of stream", tail.len());
        }

        self.finalize(conversation_id, shell, &accumulated);
        Ok(StreamEnd::Exhausted)
    }

    fn finalize(&self, conversation_id: &ConversationId, shell: &Message, accumulated: &str) {
        self.store.dispatch(StoreAction::UpdateMessage {
            conversation_id: conversation_id.clone(),
            message_id: shell.id.clone(),
            message: shell.finalized(accumulated),
        });
    }

    /// Next body chunk, `None` at end of stream.
    async fn next_chunk(
        &self,
        body: &mut ByteStream,
        cancel: &CancellationToken,
    ) -> ChatResult<Option<Bytes>> {
        let idle_timeout = self.idle_timeout;
        let read = async move {
            match idle_timeout {
                Some(limit) => tokio::time::timeout(limit, body.next())
                    .await
                    .map_err(|_| StreamError::Timeout {
                        duration_secs: limit.as_secs(),
                    }),
                None => Ok(body.next().await),
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(StreamError::Cancelled.into()),
            next = read => match next? {
                Some(Ok(chunk)) => Ok(Some(chunk)),
                Some(Err(e)) => Err(StreamError::ConnectionLost {
                    message: e.to_string(),
                }
                .into()),
                None => Ok(None),
            },
        }
    }
}
