//! chatsync - send chat messages and reconcile the streamed reply into a
//! conversation store
//!
//! This library exposes modules for use in integration tests and the
//! `chatsync` binary.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod sse;
pub mod store;
pub mod traits;
