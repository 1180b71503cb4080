//! Assistant chat transcript rows.

use serde::{Deserialize, Serialize};
use siteledger_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// One persisted assistant-chat message.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatMessage {
    pub id: DbId,
    pub user_id: DbId,
    /// One of `user`, `assistant`, `tool`.
    pub role: String,
    pub content: String,
    /// Tool-call payload for assistant messages that requested tools.
    pub tool_calls: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for appending a message to the transcript.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChatMessage {
    pub role: String,
    pub content: String,
    pub tool_calls: Option<serde_json::Value>,
}
