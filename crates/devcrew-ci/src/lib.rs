//! devcrew-ci: CI/CD collaborators around the DevCrew core.
//!
//! Everything here sits outside the orchestration core and talks to it only
//! through `ExecutionResult`:
//!
//! - [`workflow`] — GitHub Actions workflow YAML generation
//! - [`github`] — workflow dispatch and issue creation over the GitHub API
//! - [`bundle`] — deploy-bundle packaging for a completed run

pub mod bundle;
pub mod github;
pub mod workflow;

mod error;

pub use bundle::{stage_bundle, BundleManifest};
pub use error::CiError;
pub use github::GitHubClient;
pub use workflow::{render_workflow, write_workflow, WorkflowConfig};

/// Result type for devcrew-ci operations
pub type Result<T> = std::result::Result<T, CiError>;
