//! Session Entity
//!
//! Server-side session referenced by the `session_token` cookie. Only the
//! token's digest is kept here.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::user_id::{SessionId, UserId};

/// Session entity
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub session_id: SessionId,
    /// Owner
    pub user_id: UserId,
    /// Hex SHA-256 of the raw token
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    /// Both timestamps derive from the same `now`.
    pub fn new(user_id: UserId, token_hash: String, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            session_id: SessionId::new(),
            user_id,
            token_hash,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    /// Check if session has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}
