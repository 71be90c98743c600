//! devcrew-agents: built-in role capabilities.
//!
//! Default implementations of the four pipeline roles:
//!
//! - [`TemplateEngineer`] — deterministic keyword-template code generation
//! - [`HeuristicTester`] — delimiter-balance syntax validation with
//!   line-level diagnostics
//! - [`SandboxDeployer`] — tempdir-scoped staging with an optional check
//!   command, bounded by a timeout
//! - [`ReportSummarizer`] — renders the final task report
//!
//! Each is independently replaceable; the orchestrator only sees the
//! capability traits from devcrew-core.

mod devops;
mod engineer;
mod summarizer;
mod tester;

pub use devops::SandboxDeployer;
pub use engineer::TemplateEngineer;
pub use summarizer::ReportSummarizer;
pub use tester::HeuristicTester;

use std::sync::Arc;

use devcrew_core::CapabilitySet;

/// The default capability set: all four built-in agents with default
/// configuration.
pub fn default_capabilities() -> CapabilitySet {
    CapabilitySet::new(
        Arc::new(TemplateEngineer::new()),
        Arc::new(HeuristicTester::new()),
        Arc::new(SandboxDeployer::new()),
        Arc::new(ReportSummarizer::new()),
    )
}
