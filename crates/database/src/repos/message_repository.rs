//! Repository for chat message persistence.
//!
//! The message log is append-only. Rows are assigned their timestamp at
//! write time; history order is `created_at ASC, id ASC` so same-instant
//! writes fall back to insertion order.

use crate::entities::{ChatMessage, ChatMessageWithSender};
use crate::types::StorageResult;
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Repository for chat message database operations
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    /// Create a new message repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a message to a hangout's log, assigning the server timestamp.
    pub async fn append(
        &self,
        hangout_id: i64,
        user_id: i64,
        message_text: &str,
    ) -> StorageResult<ChatMessage> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO chat_messages (hangout_id, user_id, message_text, created_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(hangout_id)
        .bind(user_id)
        .bind(message_text)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let message_id = result.last_insert_rowid();

        info!(message_id, hangout_id, user_id, "appended chat message");

        Ok(ChatMessage {
            id: message_id,
            hangout_id,
            user_id,
            message_text: message_text.to_string(),
            created_at: now,
        })
    }

    /// All messages for a hangout, oldest first, with sender columns joined.
    pub async fn history(&self, hangout_id: i64) -> StorageResult<Vec<ChatMessageWithSender>> {
        let rows = sqlx::query(
            "SELECT m.id, m.hangout_id, m.user_id, m.message_text, m.created_at,
                    u.email AS sender_email, u.first_name AS sender_first_name,
                    u.photo_url AS sender_photo_url
             FROM chat_messages m
             JOIN users u ON u.id = m.user_id
             WHERE m.hangout_id = ?
             ORDER BY m.created_at ASC, m.id ASC",
        )
        .bind(hangout_id)
        .fetch_all(&self.pool)
        .await?;

        let messages = rows
            .into_iter()
            .map(|row| {
                Ok(ChatMessageWithSender {
                    id: row.try_get("id")?,
                    hangout_id: row.try_get("hangout_id")?,
                    user_id: row.try_get("user_id")?,
                    message_text: row.try_get("message_text")?,
                    created_at: row.try_get("created_at")?,
                    sender_email: row.try_get("sender_email")?,
                    sender_first_name: row.try_get("sender_first_name")?,
                    sender_photo_url: row.try_get("sender_photo_url")?,
                })
            })
            .collect::<StorageResult<Vec<_>>>()?;

        Ok(messages)
    }
}
