//! Repository for hangout and participant lookups.

use crate::entities::Hangout;
use crate::types::StorageResult;
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Repository for hangout database operations
pub struct HangoutRepository {
    pool: SqlitePool,
}

impl HangoutRepository {
    /// Create a new hangout repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Whether a hangout row exists
    pub async fn exists(&self, hangout_id: i64) -> StorageResult<bool> {
        let row = sqlx::query("SELECT 1 FROM hangouts WHERE id = ?")
            .bind(hangout_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Whether a user is a current participant of a hangout
    pub async fn is_participant(&self, hangout_id: i64, user_id: i64) -> StorageResult<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM hangout_participants WHERE hangout_id = ? AND user_id = ?",
        )
        .bind(hangout_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// Insert a hangout row. Hangout CRUD belongs to the hangout
    /// collaborator; this exists for development seeding and tests.
    pub async fn create(
        &self,
        title: &str,
        venue_location: &str,
        date_time: &str,
        creator_id: i64,
    ) -> StorageResult<Hangout> {
        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO hangouts (title, venue_location, date_time, max_group_size, description, creator_id, created_at, updated_at)
             VALUES (?, ?, ?, 5, '', ?, ?, ?)",
        )
        .bind(title)
        .bind(venue_location)
        .bind(date_time)
        .bind(creator_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        let hangout_id = result.last_insert_rowid();

        info!(hangout_id, title, "created hangout");

        Ok(Hangout {
            id: hangout_id,
            title: title.to_string(),
            venue_location: venue_location.to_string(),
            date_time: date_time.to_string(),
            max_group_size: 5,
            description: String::new(),
            creator_id,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Add a user to a hangout's participant set. Idempotent.
    pub async fn add_participant(&self, hangout_id: i64, user_id: i64) -> StorageResult<()> {
        sqlx::query(
            "INSERT OR IGNORE INTO hangout_participants (hangout_id, user_id) VALUES (?, ?)",
        )
        .bind(hangout_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find a hangout by id
    pub async fn find_by_id(&self, hangout_id: i64) -> StorageResult<Option<Hangout>> {
        let row = sqlx::query(
            "SELECT id, title, venue_location, date_time, max_group_size, description, creator_id, created_at, updated_at
             FROM hangouts WHERE id = ?",
        )
        .bind(hangout_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(Hangout {
                id: row.try_get("id")?,
                title: row.try_get("title")?,
                venue_location: row.try_get("venue_location")?,
                date_time: row.try_get("date_time")?,
                max_group_size: row.try_get("max_group_size")?,
                description: row.try_get("description")?,
                creator_id: row.try_get("creator_id")?,
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
            })),
            None => Ok(None),
        }
    }
}
