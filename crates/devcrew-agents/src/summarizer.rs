//! Final report rendering.

use async_trait::async_trait;

use devcrew_core::{
    DeploymentOutcome, Result, SummarizeCapability, SummaryRecord, ValidationReport,
};

const EXCERPT_LINES: usize = 12;

/// Built-in summarization capability.
///
/// Total over every input combination, including the gate-synthesized
/// blocked deployment status; the report always renders.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportSummarizer;

impl ReportSummarizer {
    pub fn new() -> Self {
        Self
    }
}

fn excerpt(text: &str) -> String {
    let mut lines: Vec<&str> = text.lines().take(EXCERPT_LINES).collect();
    if text.lines().count() > EXCERPT_LINES {
        lines.push("...");
    }
    if lines.is_empty() {
        "(empty)".to_string()
    } else {
        lines.join("\n")
    }
}

#[async_trait]
impl SummarizeCapability for ReportSummarizer {
    async fn summarize(
        &self,
        description: &str,
        artifact: &str,
        validation: &ValidationReport,
        deployment: &DeploymentOutcome,
    ) -> Result<SummaryRecord> {
        let overall = validation.valid && deployment.success;

        let deployment_verdict = if deployment.is_blocked() {
            "BLOCKED"
        } else if deployment.success {
            "SUCCESS"
        } else {
            "FAILED"
        };

        let summary_report = format!(
            "==== DevCrew Task Report ====\n\
             Task: {}\n\
             Overall: {}\n\
             \n\
             [Generation]\n{}\n\
             \n\
             [Validation] {}\n{}\n\
             \n\
             [Deployment] {}\n{}",
            if description.trim().is_empty() {
                "(no description)"
            } else {
                description
            },
            if overall { "SUCCESS" } else { "FAILED" },
            excerpt(artifact),
            if validation.valid { "PASSED" } else { "FAILED" },
            excerpt(&validation.report),
            deployment_verdict,
            excerpt(&deployment.log),
        );

        Ok(SummaryRecord {
            summary_report,
            valid: validation.valid,
            deployed: deployment.success,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_summary_for_successful_run() {
        let summarizer = ReportSummarizer::new();
        let record = summarizer
            .summarize(
                "Create a login system",
                "def login(): pass",
                &ValidationReport::passed("Syntax Check: PASSED"),
                &DeploymentOutcome::succeeded("Deployed to Virtual Environment!"),
            )
            .await
            .unwrap();

        assert!(record.valid);
        assert!(record.deployed);
        assert!(record.summary_report.contains("Overall: SUCCESS"));
        assert!(record.summary_report.contains("[Deployment] SUCCESS"));
    }

    #[tokio::test]
    async fn test_summary_for_blocked_run() {
        let summarizer = ReportSummarizer::new();
        let record = summarizer
            .summarize(
                "task",
                "broken(",
                &ValidationReport::failed("Syntax Error: unclosed '(' opened at line 1"),
                &DeploymentOutcome::blocked(),
            )
            .await
            .unwrap();

        assert!(!record.valid);
        assert!(!record.deployed);
        assert!(record.summary_report.contains("Overall: FAILED"));
        assert!(record.summary_report.contains("[Deployment] BLOCKED"));
        assert!(record.summary_report.contains("Blocked: Code Validation Failed"));
    }

    #[tokio::test]
    async fn test_summary_is_total_over_empty_inputs() {
        let summarizer = ReportSummarizer::new();
        let record = summarizer
            .summarize(
                "",
                "",
                &ValidationReport::failed("Error: No code provided for validation."),
                &DeploymentOutcome::blocked(),
            )
            .await
            .unwrap();

        assert!(record.summary_report.contains("(no description)"));
        assert!(record.summary_report.contains("(empty)"));
    }

    #[tokio::test]
    async fn test_long_artifacts_are_excerpted() {
        let summarizer = ReportSummarizer::new();
        let artifact = (0..40).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let record = summarizer
            .summarize(
                "task",
                &artifact,
                &ValidationReport::passed("ok"),
                &DeploymentOutcome::succeeded("done"),
            )
            .await
            .unwrap();
        assert!(record.summary_report.contains("..."));
        assert!(!record.summary_report.contains("line 39"));
    }
}
