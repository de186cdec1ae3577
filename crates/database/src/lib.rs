//! PourPal Database Crate
//!
//! Connection management, migrations, entities and repository
//! implementations for the chat backend's SQLite store.

use sqlx::SqlitePool;
use pourpal_config::DatabaseConfig;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

pub use repos::{HangoutRepository, MessageRepository, SessionRepository, UserRepository};

pub use entities::{
    hangout::Hangout,
    message::{ChatMessage, ChatMessageWithSender},
    session::Session,
    user::User,
};

pub use types::{errors::StorageError, StorageResult};

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> StorageResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| StorageError::ConnectionError(e.to_string()))?;

    run_migrations(&pool)
        .await
        .map_err(|e| StorageError::MigrationError(e.to_string()))?;

    Ok(pool)
}
