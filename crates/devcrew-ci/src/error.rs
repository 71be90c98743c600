//! Error types for devcrew-ci

use thiserror::Error;

/// Errors raised by the CI/CD collaborators.
#[derive(Error, Debug)]
pub enum CiError {
    /// GitHub credentials or repository not configured
    #[error("GitHub not configured: {0}")]
    NotConfigured(String),

    /// GitHub API returned a non-success status
    #[error("GitHub API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// HTTP transport error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// YAML rendering error
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
