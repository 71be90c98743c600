//! Error types for devcrew-store

use thiserror::Error;

/// Errors that can occur in the task persistence layer
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database connection error
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// Database query error
    #[error("Database query failed: {0}")]
    Query(String),

    /// Serialization error
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// Task not found
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Invalid task ID format
    #[error("Invalid task ID: {0}")]
    InvalidTaskId(String),

    /// Schema setup error
    #[error("Schema setup failed: {0}")]
    SchemaSetup(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Query(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
