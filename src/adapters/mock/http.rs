//! Mock HTTP client for testing.
//!
//! Provides a configurable mock HTTP client that returns scripted responses,
//! byte streams or errors, and records every request it receives.

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError, Response, StreamResponse};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method
    pub method: String,
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: Option<String>,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a buffered response
    Success(Response),
    /// Fail the request before any response
    Error(HttpError),
    /// 200 with a body made of these chunks
    Stream(Vec<Bytes>),
    /// Any status with a body made of these chunks
    StreamWithStatus { status: u16, chunks: Vec<Bytes> },
    /// A response whose body cannot be read
    StreamWithoutBody { status: u16 },
    /// 200, then the chunks, then a transport error
    StreamThenError { chunks: Vec<Bytes>, error: HttpError },
    /// 200, then the chunks, then nothing ever again
    StalledStream(Vec<Bytes>),
}

impl MockResponse {
    /// Streamed body from string chunks
    pub fn sse<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockResponse::Stream(chunks.into_iter().map(|c| Bytes::from(c.into())).collect())
    }

    /// Buffered JSON body with the given status
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        MockResponse::Success(Response::new(status, Bytes::from(body.to_string())))
    }
}

/// Mock HTTP client for testing.
///
/// Responses are matched by exact URL first, then by the longest configured
/// prefix, then the default.
///
/// # Example
///
/// ```ignore
/// use chatsync::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://localhost:5000/api/conversations/c1/messages?stream=true",
///     MockResponse::sse(["data: {\"token\":\"Hi\"}\n", "data: [DONE]\n"]),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct MockHttpClient {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_response: Arc::new(Mutex::new(None)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a response for a URL or URL prefix.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        lock(&self.responses).insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    /// Clear all configured responses.
    pub fn clear_responses(&self) {
        lock(&self.responses).clear();
    }

    fn record_request(&self, method: &str, url: &str, headers: &Headers, body: Option<String>) {
        lock(&self.requests).push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body,
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        let responses = lock(&self.responses);

        if let Some(response) = responses.get(url) {
            return Some(response.clone());
        }

        let by_prefix = responses
            .iter()
            .filter(|(pattern, _)| url.starts_with(pattern.as_str()))
            .max_by_key(|(pattern, _)| pattern.len())
            .map(|(_, response)| response.clone());
        if by_prefix.is_some() {
            return by_prefix;
        }

        lock(&self.default_response).clone()
    }
}

impl Default for MockHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn chunk_stream(chunks: Vec<Bytes>) -> impl futures::Stream<Item = Result<Bytes, HttpError>> + Send {
    futures::stream::iter(chunks.into_iter().map(Ok::<Bytes, HttpError>))
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post(&self, url: &str, body: &str, headers: &Headers) -> Result<Response, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));

        match self.get_response(url) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            Some(_) => Err(HttpError::Other(
                "Stream response on non-stream request".to_string(),
            )),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }

    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<StreamResponse, HttpError> {
        self.record_request("POST", url, headers, Some(body.to_string()));

        let response = match self.get_response(url) {
            Some(MockResponse::Stream(chunks)) => {
                let body: ByteStream = Box::pin(chunk_stream(chunks));
                StreamResponse::new(200, Some(body))
            }
            Some(MockResponse::StreamWithStatus { status, chunks }) => {
                let body: ByteStream = Box::pin(chunk_stream(chunks));
                StreamResponse::new(status, Some(body))
            }
            Some(MockResponse::StreamWithoutBody { status }) => StreamResponse::new(status, None),
            Some(MockResponse::StreamThenError { chunks, error }) => {
                let body: ByteStream =
                    Box::pin(chunk_stream(chunks).chain(futures::stream::once(async move {
                        Err(error)
                    })));
                StreamResponse::new(200, Some(body))
            }
            Some(MockResponse::StalledStream(chunks)) => {
                let body: ByteStream =
                    Box::pin(chunk_stream(chunks).chain(futures::stream::pending()));
                StreamResponse::new(200, Some(body))
            }
            Some(MockResponse::Success(response)) => {
                let body: ByteStream = Box::pin(chunk_stream(vec![response.body]));
                StreamResponse {
                    status: response.status,
                    headers: response.headers,
                    body: Some(body),
                }
            }
            Some(MockResponse::Error(err)) => return Err(err),
            None => return Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        };

        Ok(response)
    }
}
