//! Mock implementations for test fixtures.
//!
//! Re-exports the mocks from `chatsync::adapters::mock` and adds a builder
//! for common response setups.

pub use chatsync::adapters::mock::{MockHttpClient, MockResponse, RecordedRequest};
pub use chatsync::traits::{Headers, HttpClient, HttpError, Response};

use bytes::Bytes;

/// Configuration for setting up mock HTTP responses.
pub struct MockHttpConfig {
    client: MockHttpClient,
}

impl MockHttpConfig {
    /// Creates a new mock HTTP configuration.
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Streams these chunks for every unmatched URL.
    pub fn with_sse(self, chunks: &[&str]) -> Self {
        self.client.set_default_response(MockResponse::sse(chunks.iter().copied()));
        self
    }

    /// Streams raw byte chunks for every unmatched URL.
    pub fn with_sse_bytes(self, chunks: Vec<Vec<u8>>) -> Self {
        self.client.set_default_response(MockResponse::Stream(
            chunks.into_iter().map(Bytes::from).collect(),
        ));
        self
    }

    /// Configures a JSON response for a URL.
    pub fn with_json_response(self, url: &str, status: u16, json: &str) -> Self {
        self.client.set_response(
            url,
            MockResponse::Success(Response::new(status, Bytes::from(json.to_string()))),
        );
        self
    }

    /// Configures a response for a URL.
    pub fn with_response(self, url: &str, response: MockResponse) -> Self {
        self.client.set_response(url, response);
        self
    }

    /// Builds the configured MockHttpClient.
    pub fn build(self) -> MockHttpClient {
        self.client
    }
}

impl Default for MockHttpConfig {
    fn default() -> Self {
        Self::new()
    }
}
