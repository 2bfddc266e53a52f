//! SQLite storage for the msgqueue server.
//!
//! Provides persistence for users, API keys, and messages. Every component
//! receives a clone of the same [`QueueDatabase`] handle at construction.

mod db;
mod models;
mod queries;
mod queries_messages;


pub use db::QueueDatabase;
pub use models::*;
pub use msgqueue_core::db::DatabaseError;
