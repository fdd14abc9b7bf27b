//! Content fingerprinting.
//!
//! A fingerprint is the lower-case hex SHA-256 digest of a file's full byte
//! content. It is used purely as an equality proxy: two paths with the same
//! fingerprint are considered unchanged, and the digest is never decoded
//! back into content.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A content fingerprint (lower-case hex SHA-256 digest).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Compute the fingerprint of a byte slice.
    pub fn of_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hex::encode(hasher.finalize()))
    }

    /// Wrap an already-encoded hex digest.
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Get the digest as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
