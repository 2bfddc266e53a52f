//! msgqueue Server Library
//!
//! Core functionality for the msgqueue server:
//! - SQLite storage for users, API keys, and messages
//! - Password verification and API key lifecycle
//! - Role-gated HTTP API for appending, paging, and purging messages
//! - Background retention purge

pub mod auth;
pub mod error;
pub mod messages;
pub mod retention;
pub mod server;
pub mod storage;

pub use error::{QueueError, Result};
