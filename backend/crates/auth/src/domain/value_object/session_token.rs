//! Session Token Value Object
//!
//! The raw token travels only in the cookie and the login response; the
//! store keeps its SHA-256 digest.

use platform::crypto::{generate_token, sha256_hex};
use std::fmt;

/// Prefix of every issued session token
pub const SESSION_TOKEN_PREFIX: &str = "lps_";

/// Raw session token
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Issue a fresh token: prefix + 32 CSPRNG bytes, base64url without padding
    pub fn generate() -> Self {
        Self(generate_token(SESSION_TOKEN_PREFIX))
    }

    /// Wrap a token presented by a client
    pub fn from_client(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Hex SHA-256 digest, the lookup key in the `sessions` collection
    pub fn hash(&self) -> String {
        sha256_hex(self.0.as_bytes())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"[REDACTED]").finish()
    }
}
