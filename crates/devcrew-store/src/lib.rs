//! devcrew-store: Task Store for DevCrew
//!
//! This crate provides the persistence layer for the DevCrew pipeline.
//! All artifact payloads cross the trait boundary as opaque JSON values,
//! so the backend technology stays swappable.
//!
//! ## Key components
//!
//! - `TaskStore`: async trait every backend implements
//! - `MemoryTaskStore`: in-memory fake for tests
//! - `SqliteTaskStore`: durable SQLite backend

mod error;
pub mod fakes;
mod sqlite;
pub mod store_traits;

pub use error::StoreError;
pub use fakes::{FailingTaskStore, MemoryTaskStore};
pub use sqlite::SqliteTaskStore;
pub use store_traits::{StoreResult, TaskId, TaskRow, TaskStore};

/// Result type for devcrew-store operations
pub type Result<T> = std::result::Result<T, StoreError>;
