//! Core domain model for DevCrew.
//!
//! # Module layout
//!
//! - [`task`] — `Task` identity and creation metadata
//! - [`message`] — `Role`, `MessageKind`, `Message`
//! - [`report`] — stage outcomes and `ExecutionResult`
//! - [`error`] — `CrewError`, `Result`

pub mod error;
pub mod message;
pub mod report;
pub mod task;

pub use error::{CrewError, Result};
pub use message::{Message, MessageKind, Role};
pub use report::{
    DeploymentOutcome, ExecutionResult, SummaryRecord, ValidationReport, BLOCKED_LOG,
};
pub use task::Task;
