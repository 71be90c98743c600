//! GitHub API glue: workflow dispatch and issue creation.
//!
//! Payload construction is kept in pure functions so it can be tested
//! without network access; the client methods only add transport.

use serde_json::{json, Value};
use tracing::info;

use devcrew_core::ExecutionResult;

use crate::{CiError, Result};

const DEFAULT_API_BASE: &str = "https://api.github.com";
const ARTIFACT_EXCERPT_CHARS: usize = 1000;

/// Build the workflow_dispatch payload for a task.
pub fn dispatch_payload(task_description: &str, branch: &str, environment: &str) -> Value {
    json!({
        "ref": branch,
        "inputs": {
            "task_description": task_description,
            "environment": environment,
        },
    })
}

/// Build an issue payload describing a completed run.
pub fn issue_payload(result: &ExecutionResult) -> Value {
    let status = if result.success { "Success" } else { "Failed" };
    let mut title_task: String = result.description.chars().take(50).collect();
    if result.description.chars().count() > 50 {
        title_task.push_str("...");
    }

    let excerpt: String = result.artifact.chars().take(ARTIFACT_EXCERPT_CHARS).collect();
    let body = format!(
        "## DevCrew Task Result\n\n\
         **Task**: {}\n\n\
         ### Results\n\
         - **Status**: {}\n\
         - **Duration**: {} ms\n\
         - **Validation**: {}\n\
         - **Deployment**: {}\n\n\
         ### Generated Code\n```python\n{}\n```\n\n\
         ### Summary\n{}\n",
        result.description,
        status,
        result.duration_ms,
        if result.validation.valid { "passed" } else { "failed" },
        if result.deployment.success { "succeeded" } else { "failed" },
        excerpt,
        result.summary.summary_report,
    );

    json!({
        "title": format!("DevCrew: {title_task}"),
        "body": body,
        "labels": ["devcrew", "generated"],
    })
}

/// Thin client over the GitHub REST API.
pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
    repo: String,
    api_base: String,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.into(),
            repo: repo.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Read `GITHUB_TOKEN` and `GITHUB_REPOSITORY` from the environment.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("GITHUB_TOKEN")
            .map_err(|_| CiError::NotConfigured("GITHUB_TOKEN not set".to_string()))?;
        let repo = std::env::var("GITHUB_REPOSITORY")
            .map_err(|_| CiError::NotConfigured("GITHUB_REPOSITORY not set".to_string()))?;
        Ok(Self::new(token, repo))
    }

    /// Override the API base URL (test servers, GitHub Enterprise).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    async fn post(&self, url: &str, payload: &Value) -> Result<reqwest::Response> {
        let response = self
            .http
            .post(url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", "devcrew")
            .json(payload)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(CiError::Api { status, body })
        }
    }

    /// Trigger the devcrew workflow for a task via workflow_dispatch.
    pub async fn trigger_pipeline(
        &self,
        task_description: &str,
        branch: &str,
        environment: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/repos/{}/actions/workflows/devcrew.yml/dispatches",
            self.api_base, self.repo
        );
        self.post(&url, &dispatch_payload(task_description, branch, environment))
            .await?;
        info!(repo = %self.repo, branch = %branch, "pipeline dispatch triggered");
        Ok(())
    }

    /// Open an issue describing a completed run. Returns the issue URL.
    pub async fn create_issue(&self, result: &ExecutionResult) -> Result<String> {
        let url = format!("{}/repos/{}/issues", self.api_base, self.repo);
        let response = self.post(&url, &issue_payload(result)).await?;
        let body: Value = response.json().await?;
        Ok(body["html_url"].as_str().unwrap_or_default().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devcrew_core::{DeploymentOutcome, SummaryRecord, ValidationReport};

    fn sample_result(success: bool) -> ExecutionResult {
        ExecutionResult {
            run_id: "run-1".to_string(),
            success,
            description: "Create a login system".to_string(),
            project: None,
            artifact: "def login(): pass".to_string(),
            validation: ValidationReport::passed("Syntax Check: PASSED"),
            deployment: if success {
                DeploymentOutcome::succeeded("Deployed to Virtual Environment!")
            } else {
                DeploymentOutcome::blocked()
            },
            summary: SummaryRecord {
                summary_report: "report text".to_string(),
                valid: true,
                deployed: success,
            },
            history: vec![],
            duration_ms: 42,
        }
    }

    #[test]
    fn test_dispatch_payload_shape() {
        let payload = dispatch_payload("Create a login system", "main", "development");
        assert_eq!(payload["ref"], "main");
        assert_eq!(payload["inputs"]["task_description"], "Create a login system");
        assert_eq!(payload["inputs"]["environment"], "development");
    }

    #[test]
    fn test_issue_payload_for_successful_run() {
        let payload = issue_payload(&sample_result(true));
        assert_eq!(payload["title"], "DevCrew: Create a login system");
        let body = payload["body"].as_str().unwrap();
        assert!(body.contains("**Status**: Success"));
        assert!(body.contains("def login(): pass"));
        assert_eq!(payload["labels"][0], "devcrew");
    }

    #[test]
    fn test_issue_title_truncates_long_descriptions() {
        let mut result = sample_result(true);
        result.description = "x".repeat(80);
        let payload = issue_payload(&result);
        let title = payload["title"].as_str().unwrap();
        assert!(title.ends_with("..."));
        assert!(title.len() < 70);
    }

    #[test]
    fn test_from_env_requires_configuration() {
        // Only run when the ambient environment is clean of GitHub vars.
        if std::env::var("GITHUB_TOKEN").is_err() || std::env::var("GITHUB_REPOSITORY").is_err() {
            assert!(matches!(
                GitHubClient::from_env(),
                Err(CiError::NotConfigured(_))
            ));
        }
    }
}
