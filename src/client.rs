//! Conversation API client for backend communication.
//!
//! Builds the endpoint URLs and request bodies for posting a message, and
//! maps transport failures to typed errors. Status checks happen here so
//! that every [`HttpClient`] implementation behaves the same.

use crate::config::ClientConfig;
use crate::error::{ChatResult, NetworkError, StreamError};
use crate::models::{ConversationId, Message, SendMessageRequest};
use crate::traits::{ByteStream, Headers, HttpClient};

/// Client for the conversation message endpoints.
pub struct ConversationClient<C: HttpClient> {
    http: C,
    base_url: String,
    api_base: String,
}

impl<C: HttpClient> ConversationClient<C> {
    pub fn new(http: C, config: &ClientConfig) -> Self {
        Self {
            http,
            base_url: config.base_url().to_string(),
            api_base: config.api_base(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/api/conversations/{id}/messages?stream=true`
    pub fn stream_url(&self, conversation_id: &ConversationId) -> String {
        format!(
            "{}/api/conversations/{}/messages?stream=true",
            self.base_url,
            urlencoding::encode(conversation_id.as_str())
        )
    }

    /// `{api_base}/conversations/{id}/messages`
    pub fn messages_url(&self, conversation_id: &ConversationId) -> String {
        format!(
            "{}/conversations/{}/messages",
            self.api_base,
            urlencoding::encode(conversation_id.as_str())
        )
    }

    fn json_headers() -> Headers {
        let mut headers = Headers::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        headers
    }

    /// Post a message and wait for the complete reply.
    pub async fn post_message(
        &self,
        conversation_id: &ConversationId,
        content: &str,
    ) -> ChatResult<Message> {
        let url = self.messages_url(conversation_id);
        let body = serde_json::to_string(&SendMessageRequest::new(content))?;

        tracing::debug!("POST {}", url);
        let response = self.http.post(&url, &body, &Self::json_headers()).await?;

        if !response.is_success() {
            return Err(NetworkError::HttpStatus {
                status: response.status,
                message: response.text_lossy(),
            }
            .into());
        }

        Ok(response.json::<Message>()?)
    }

    /// Post a message and return the SSE reply body.
    ///
    /// Fails before reading anything if the status is not 2xx or the
    /// response has no body.
    pub async fn open_stream(
        &self,
        conversation_id: &ConversationId,
        content: &str,
    ) -> ChatResult<ByteStream> {
        let url = self.stream_url(conversation_id);
        let body = serde_json::to_string(&SendMessageRequest::new(content))?;

        let mut headers = Self::json_headers();
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        tracing::debug!("POST {} (stream)", url);
        let response = self.http.post_stream(&url, &body, &headers).await?;

        if !response.is_success() {
            return Err(NetworkError::HttpStatus {
                status: response.status,
                message: String::new(),
            }
            .into());
        }

        response.body.ok_or_else(|| StreamError::MissingBody.into())
    }
}
