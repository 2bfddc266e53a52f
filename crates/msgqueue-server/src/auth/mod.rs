//! Authentication and authorization for the queue.
//!
//! Password verification, API key lifecycle, and the role model.

pub mod api_keys;
pub mod credentials;
pub mod digest;
pub mod role;

pub use api_keys::ApiKeyManager;
pub use credentials::CredentialStore;
pub use role::Role;
