//! Repository for the assistant chat transcript.

use siteledger_core::types::DbId;
use sqlx::PgPool;

use crate::models::chat::{ChatMessage, CreateChatMessage};

const COLUMNS: &str = "id, user_id, role, content, tool_calls, created_at";

/// Provides persistence for per-user assistant transcripts.
pub struct ChatRepo;

impl ChatRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateChatMessage,
    ) -> Result<ChatMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO chat_messages (user_id, role, content, tool_calls)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(user_id)
            .bind(&input.role)
            .bind(&input.content)
            .bind(&input.tool_calls)
            .fetch_one(pool)
            .await
    }

    /// List a user's transcript oldest-first, capped at `limit` messages.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM (
                SELECT {COLUMNS} FROM chat_messages
                WHERE user_id = $1 ORDER BY id DESC LIMIT $2
             ) recent ORDER BY id ASC"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Delete a user's entire transcript, returning the number of rows removed.
    pub async fn clear_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM chat_messages WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
