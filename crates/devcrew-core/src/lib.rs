//! DevCrew Core Library
//!
//! The orchestration core of the DevCrew pipeline: a message-passing
//! coordinator that sequences four role capabilities (generate, validate,
//! deploy, summarize) over a single task description, records every
//! inter-role handoff, and composes a final `ExecutionResult`.

pub mod capability;
pub mod domain;
pub mod obs;
pub mod observer;
pub mod orchestrator;
pub mod persist;
pub mod record;
pub mod telemetry;

pub use capability::{
    CapabilitySet, DeployCapability, GenerateCapability, SummarizeCapability, ValidateCapability,
};
pub use domain::{
    CrewError, DeploymentOutcome, ExecutionResult, Message, MessageKind, Result, Role,
    SummaryRecord, Task, ValidationReport, BLOCKED_LOG,
};
pub use observer::{NullObserver, PipelineObserver, Stage, TracingObserver};
pub use orchestrator::{Orchestrator, RunOptions};
pub use persist::TaskRecorder;
pub use record::ExecutionRecord;
pub use telemetry::init_tracing;

/// DevCrew version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
