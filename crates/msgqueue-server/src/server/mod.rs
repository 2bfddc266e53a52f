//! HTTP server for the msgqueue API.

pub mod error;
pub mod gate;
pub mod routes;

pub use gate::{AccessGate, Principal};
pub use routes::{AppState, build_router};
