//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Generic limit parameter (`?limit=`) for capped listings.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// Default and maximum listing limits.
pub const DEFAULT_LIMIT: i64 = 100;
pub const MAX_LIMIT: i64 = 500;

impl LimitParams {
    /// Effective limit: default when absent, clamped to `1..=MAX_LIMIT`.
    pub fn effective(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}
