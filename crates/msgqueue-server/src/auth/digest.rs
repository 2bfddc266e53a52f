//! Secret digests for passwords and API keys.
//!
//! Both use unsalted SHA-256 rendered as lowercase hex, matching records
//! written by earlier deployments. This is a known weakness for password
//! storage (fast, unsalted); changing it requires migrating stored hashes.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Hash a secret for storage (raw secrets are never stored).
pub fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compare two digests without short-circuiting on the first differing byte.
pub fn digests_match(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
