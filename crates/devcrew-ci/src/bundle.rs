//! Deploy-bundle packaging.
//!
//! Stages the artifacts of a completed run into a directory ready for
//! hand-off to an external deployment target: the generated code, the
//! rendered report, and a metadata manifest. No upload happens here —
//! remote deployment stays outside the system.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use devcrew_core::ExecutionResult;

use crate::Result;

/// Files written by [`stage_bundle`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BundleManifest {
    pub artifact: PathBuf,
    pub report: PathBuf,
    pub metadata: PathBuf,
}

/// Stage a deploy bundle for `result` under `out_dir`.
///
/// Creates `out_dir` (and parents) if needed. Existing bundle files are
/// overwritten; a bundle is a derived view of the run, not a record of it.
pub fn stage_bundle(result: &ExecutionResult, out_dir: &Path) -> Result<BundleManifest> {
    std::fs::create_dir_all(out_dir)?;

    let artifact = out_dir.join("artifact.py");
    std::fs::write(&artifact, &result.artifact)?;

    let report = out_dir.join("REPORT.md");
    let report_text = format!(
        "# DevCrew Deploy Bundle\n\n\
         Task: {}\n\n\
         ```\n{}\n```\n",
        result.description, result.summary.summary_report
    );
    std::fs::write(&report, report_text)?;

    let metadata = out_dir.join("metadata.json");
    let meta = json!({
        "run_id": result.run_id,
        "project": result.project,
        "success": result.success,
        "valid": result.validation.valid,
        "deployed": result.deployment.success,
        "duration_ms": result.duration_ms,
        "staged_at": Utc::now().to_rfc3339(),
    });
    std::fs::write(&metadata, serde_json::to_string_pretty(&meta)?)?;

    info!(dir = %out_dir.display(), "deploy bundle staged");
    Ok(BundleManifest {
        artifact,
        report,
        metadata,
    })
}
