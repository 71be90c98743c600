//! Heuristic artifact validation.
//!
//! The tester never executes the artifact. It runs a delimiter-balance scan
//! (string- and comment-aware) over the text and reports the line of the
//! first defect it finds, plus a couple of cheap quality heuristics when the
//! scan passes.

use async_trait::async_trait;

use devcrew_core::{Result, ValidateCapability, ValidationReport};

/// Built-in validation capability.
///
/// Total over any input: an empty artifact is classified invalid with an
/// explanatory report, never a fault.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicTester;

impl HeuristicTester {
    pub fn new() -> Self {
        Self
    }
}

/// Outcome of the balance scan: either clean, or a diagnostic naming the
/// defect and its line.
fn scan_delimiters(artifact: &str) -> std::result::Result<(), String> {
    let mut stack: Vec<(char, usize)> = Vec::new();
    let mut in_string: Option<(char, usize)> = None;
    let mut escaped = false;

    for (idx, line) in artifact.lines().enumerate() {
        let line_no = idx + 1;
        for c in line.chars() {
            if let Some((quote, _)) = in_string {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == quote {
                    in_string = None;
                }
                continue;
            }
            match c {
                '#' => break, // comment to end of line
                '\'' | '"' => in_string = Some((c, line_no)),
                '(' | '[' | '{' => stack.push((c, line_no)),
                ')' | ']' | '}' => {
                    let expected = match c {
                        ')' => '(',
                        ']' => '[',
                        _ => '{',
                    };
                    match stack.pop() {
                        Some((open, _)) if open == expected => {}
                        _ => {
                            return Err(format!("Syntax Error: unmatched '{c}' at line {line_no}"))
                        }
                    }
                }
                _ => {}
            }
        }
        // escapes do not carry across lines
        escaped = false;
    }

    if let Some((quote, line_no)) = in_string {
        return Err(format!(
            "Syntax Error: unterminated {quote}-string starting at line {line_no}"
        ));
    }
    if let Some((open, line_no)) = stack.pop() {
        return Err(format!(
            "Syntax Error: unclosed '{open}' opened at line {line_no}"
        ));
    }
    Ok(())
}

#[async_trait]
impl ValidateCapability for HeuristicTester {
    async fn validate(&self, artifact: &str) -> Result<ValidationReport> {
        if artifact.trim().is_empty() {
            return Ok(ValidationReport::failed(
                "Error: No code provided for validation.",
            ));
        }

        if let Err(diagnostic) = scan_delimiters(artifact) {
            return Ok(ValidationReport::failed(diagnostic));
        }

        let mut report = vec!["Syntax Check: PASSED".to_string()];

        let needle = artifact.to_lowercase();
        if needle.contains("login") || needle.contains("auth") {
            report.push("Context Verification: auth-related definitions present".to_string());
        }

        let line_count = artifact.lines().count();
        if line_count > 5 {
            report.push(format!("Complexity: {line_count} lines (satisfactory)"));
        }

        Ok(ValidationReport::passed(report.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_artifact_is_invalid() {
        let tester = HeuristicTester::new();
        let report = tester.validate("").await.unwrap();
        assert!(!report.valid);
        assert!(report.report.contains("No code provided"));

        let report = tester.validate("   \n  ").await.unwrap();
        assert!(!report.valid);
    }

    #[tokio::test]
    async fn test_balanced_artifact_passes() {
        let tester = HeuristicTester::new();
        let report = tester
            .validate("def login(): pass")
            .await
            .unwrap();
        assert!(report.valid);
        assert!(report.report.starts_with("Syntax Check: PASSED"));
        assert!(report.report.contains("Context Verification"));
    }

    #[tokio::test]
    async fn test_unmatched_close_names_line() {
        let tester = HeuristicTester::new();
        let report = tester
            .validate("def f():\n    return (a + b))\n")
            .await
            .unwrap();
        assert!(!report.valid);
        assert!(report.report.contains("unmatched ')'"));
        assert!(report.report.contains("line 2"));
    }

    #[tokio::test]
    async fn test_unclosed_open_names_line() {
        let tester = HeuristicTester::new();
        let report = tester.validate("x = [1, 2, 3\ny = 4").await.unwrap();
        assert!(!report.valid);
        assert!(report.report.contains("unclosed '['"));
        assert!(report.report.contains("line 1"));
    }

    #[tokio::test]
    async fn test_unterminated_string_reported() {
        let tester = HeuristicTester::new();
        let report = tester.validate("x = 'oops").await.unwrap();
        assert!(!report.valid);
        assert!(report.report.contains("unterminated"));
    }

    #[tokio::test]
    async fn test_brackets_inside_strings_and_comments_ignored() {
        let tester = HeuristicTester::new();
        let report = tester
            .validate("x = '(['  # also ignored: {[(\ny = \"}\"")
            .await
            .unwrap();
        assert!(report.valid, "got: {}", report.report);
    }

    #[tokio::test]
    async fn test_escaped_quote_does_not_close_string() {
        let tester = HeuristicTester::new();
        let report = tester.validate(r"x = 'it\'s fine'").await.unwrap();
        assert!(report.valid, "got: {}", report.report);
    }

    #[tokio::test]
    async fn test_complexity_line_reported_for_longer_artifacts() {
        let tester = HeuristicTester::new();
        let artifact = (0..8).map(|i| format!("x{i} = {i}")).collect::<Vec<_>>().join("\n");
        let report = tester.validate(&artifact).await.unwrap();
        assert!(report.valid);
        assert!(report.report.contains("Complexity: 8 lines"));
    }
}
