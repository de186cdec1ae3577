//! Repository for session credential lookups.

use crate::entities::Session;
use crate::types::StorageResult;
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Repository for session database operations
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a session by its opaque token
    pub async fn find_by_token(&self, token: &str) -> StorageResult<Option<Session>> {
        let row = sqlx::query(
            "SELECT id, token, user_id, created_at, expires_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Session {
                id: row.try_get("id")?,
                token: row.try_get("token")?,
                user_id: row.try_get("user_id")?,
                created_at: row.try_get("created_at")?,
                expires_at: row.try_get("expires_at")?,
            })),
            None => Ok(None),
        }
    }

    /// Insert a session row. Login belongs to the account collaborator; this
    /// exists for development seeding and tests.
    pub async fn create(
        &self,
        user_id: i64,
        token: &str,
        expires_at: &str,
    ) -> StorageResult<Session> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
        )
        .bind(token)
        .bind(user_id)
        .bind(&now)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        info!(user_id, "created session");

        Ok(Session {
            id: result.last_insert_rowid(),
            token: token.to_string(),
            user_id,
            created_at: now,
            expires_at: expires_at.to_string(),
        })
    }
}
