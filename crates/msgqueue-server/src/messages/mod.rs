//! Durable message log: append, cursor pagination, and retention purge.

mod store;

pub use store::{MessageStore, retention_cutoff, validate_content};
