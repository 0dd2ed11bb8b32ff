//! Trait abstractions for dependency injection and testability.
//!
//! The dispatcher talks to the backend only through [`HttpClient`], so tests
//! can drive it with scripted byte streams instead of a live server.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP client operations (POST, streaming POST)

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response, StreamResponse};
