//! Sandbox deployment simulation.
//!
//! The deployer stages the artifact into a scoped temp directory, optionally
//! runs a configured check command over it, and reports a phased log. The
//! temp directory is released on every exit path (RAII `TempDir`). All
//! expected failures — non-zero exit, timeout, spawn error — are captured in
//! `(success = false, log)`; the capability itself never faults over them.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use devcrew_core::{DeployCapability, DeploymentOutcome, Result};

/// Placeholder in a check command that is replaced with the staged artifact
/// path.
pub const ARTIFACT_PLACEHOLDER: &str = "{artifact}";

/// Built-in deploy capability.
#[derive(Debug, Clone)]
pub struct SandboxDeployer {
    /// Optional check command run against the staged artifact; occurrences
    /// of `{artifact}` are replaced with the staged file path. When `None`,
    /// deployment is staging-only.
    check_command: Option<Vec<String>>,

    /// Upper bound on the check command's runtime.
    timeout_secs: u64,
}

impl Default for SandboxDeployer {
    fn default() -> Self {
        Self {
            check_command: None,
            timeout_secs: 60,
        }
    }
}

impl SandboxDeployer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_check_command(mut self, command: Vec<String>) -> Self {
        self.check_command = Some(command);
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    async fn run_check(
        &self,
        command: &[String],
        artifact_path: &std::path::Path,
        log: &mut Vec<String>,
    ) -> bool {
        let resolved: Vec<String> = command
            .iter()
            .map(|part| part.replace(ARTIFACT_PLACEHOLDER, &artifact_path.to_string_lossy()))
            .collect();

        if resolved.is_empty() {
            log.push("Check command is empty, skipping.".to_string());
            return true;
        }

        // kill_on_drop: if the timeout branch drops the wait future, the
        // child must not outlive the sandbox.
        let child = match Command::new(&resolved[0])
            .args(&resolved[1..])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                log.push(format!("Check Failed: could not spawn '{}': {e}", resolved[0]));
                return false;
            }
        };

        let output = if self.timeout_secs > 0 {
            match tokio::time::timeout(
                Duration::from_secs(self.timeout_secs),
                child.wait_with_output(),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => {
                    log.push(format!(
                        "Check Failed: timed out after {} seconds",
                        self.timeout_secs
                    ));
                    return false;
                }
            }
        } else {
            child.wait_with_output().await
        };

        let output = match output {
            Ok(output) => output,
            Err(e) => {
                log.push(format!("Check Failed: {e}"));
                return false;
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stdout.trim().is_empty() {
            log.push(format!("STDOUT:\n{}", stdout.trim_end()));
        }
        if !stderr.trim().is_empty() {
            log.push(format!("STDERR:\n{}", stderr.trim_end()));
        }

        if output.status.success() {
            log.push("Checks Passed.".to_string());
            true
        } else {
            log.push(format!(
                "Check Failed: exit code {}",
                output.status.code().unwrap_or(-1)
            ));
            false
        }
    }
}

#[async_trait]
impl DeployCapability for SandboxDeployer {
    async fn deploy(&self, artifact: &str) -> Result<DeploymentOutcome> {
        let mut log = vec!["--- Staging Phase ---".to_string()];

        // Scoped acquisition: the directory is removed when `sandbox` drops,
        // on every path out of this function.
        let sandbox = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                log.push(format!("Staging Failed: could not create sandbox: {e}"));
                return Ok(DeploymentOutcome::failed(log.join("\n")));
            }
        };

        let artifact_path = sandbox.path().join("artifact.py");
        if let Err(e) = tokio::fs::write(&artifact_path, artifact).await {
            log.push(format!("Staging Failed: could not write artifact: {e}"));
            return Ok(DeploymentOutcome::failed(log.join("\n")));
        }
        log.push(format!("Artifact staged ({} bytes).", artifact.len()));
        debug!(path = %artifact_path.display(), "artifact staged in sandbox");

        if let Some(command) = &self.check_command {
            log.push("--- Testing Phase ---".to_string());
            if !self.run_check(command, &artifact_path, &mut log).await {
                return Ok(DeploymentOutcome::failed(log.join("\n")));
            }
        }

        log.push("Deployed to Virtual Environment!".to_string());
        Ok(DeploymentOutcome::succeeded(log.join("\n")))
    }
}
