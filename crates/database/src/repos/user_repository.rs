//! Repository for user data access operations.

use crate::entities::User;
use crate::types::StorageResult;
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Repository for user database operations
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a user by id
    pub async fn find_by_id(&self, id: i64) -> StorageResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, first_name, photo_url, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(User {
                id: row.try_get("id")?,
                email: row.try_get("email")?,
                first_name: row.try_get("first_name")?,
                photo_url: row.try_get("photo_url")?,
                created_at: row.try_get("created_at")?,
            })),
            None => Ok(None),
        }
    }

    /// Insert a user row. Account creation belongs to the account
    /// collaborator; this exists for development seeding and tests.
    pub async fn create(
        &self,
        email: &str,
        first_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> StorageResult<User> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO users (email, first_name, photo_url, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(email)
        .bind(first_name)
        .bind(photo_url)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let user_id = result.last_insert_rowid();

        info!(user_id, email, "created user");

        Ok(User {
            id: user_id,
            email: email.to_string(),
            first_name: first_name.map(str::to_string),
            photo_url: photo_url.map(str::to_string),
            created_at: now,
        })
    }
}
