//! Shared types for the database layer

pub mod errors;

pub use errors::StorageError;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
