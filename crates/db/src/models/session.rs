//! Refresh-token session rows.

use siteledger_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A refresh-token row. Only the SHA-256 hash of the token is stored.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl RefreshToken {
    /// Whether the token is usable at `now` (not revoked, not expired).
    pub fn is_valid(&self, now: Timestamp) -> bool {
        self.revoked_at.is_none() && self.expires_at > now
    }
}
