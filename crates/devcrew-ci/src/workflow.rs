//! GitHub Actions workflow generation.
//!
//! Renders a dispatchable pipeline workflow: a `workflow_dispatch` trigger
//! with task-description and environment inputs, push/pull_request triggers,
//! the pipeline job itself, and a deploy job gated on the production
//! environment.

use std::path::Path;

use serde_json::{json, Value};

use crate::Result;

/// Options for the generated workflow.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Workflow name, also used in the `devcrew run` step.
    pub name: String,

    /// Branches that trigger the pipeline on push / pull_request.
    pub branches: Vec<String>,

    /// Deployment environment choices offered by workflow_dispatch.
    pub environments: Vec<String>,

    /// Extra steps appended to the pipeline job.
    pub additional_steps: Vec<Value>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            name: "devcrew-pipeline".to_string(),
            branches: vec!["main".to_string(), "master".to_string()],
            environments: vec![
                "development".to_string(),
                "staging".to_string(),
                "production".to_string(),
            ],
            additional_steps: Vec::new(),
        }
    }
}

/// Build the workflow document as a JSON tree (YAML superset).
fn workflow_document(config: &WorkflowConfig) -> Value {
    let mut steps = vec![
        json!({
            "name": "Checkout repository",
            "uses": "actions/checkout@v4",
        }),
        json!({
            "name": "Install Rust toolchain",
            "uses": "dtolnay/rust-toolchain@stable",
        }),
        json!({
            "name": "Build DevCrew",
            "run": "cargo build --release --workspace",
        }),
        json!({
            "name": "Run DevCrew pipeline",
            "env": {
                "TASK_DESCRIPTION": "${{ github.event.inputs.task_description }}",
                "RUST_LOG": "info",
            },
            "run": "cargo run --release -p devcrew-cli -- run --task \"$TASK_DESCRIPTION\"",
        }),
        json!({
            "name": "Upload artifacts",
            "uses": "actions/upload-artifact@v4",
            "with": {
                "name": "devcrew-output",
                "path": ".devcrew/",
            },
        }),
    ];
    steps.extend(config.additional_steps.iter().cloned());

    json!({
        "name": config.name,
        "on": {
            "workflow_dispatch": {
                "inputs": {
                    "task_description": {
                        "description": "DevCrew task description",
                        "required": true,
                        "type": "string",
                    },
                    "environment": {
                        "description": "Deployment environment",
                        "required": false,
                        "default": config.environments.first().cloned().unwrap_or_default(),
                        "type": "choice",
                        "options": &config.environments,
                    },
                },
            },
            "push": {
                "branches": &config.branches,
                "paths": ["src/**", "crates/**", "Cargo.toml"],
            },
            "pull_request": {
                "branches": &config.branches,
            },
        },
        "jobs": {
            "pipeline": {
                "runs-on": "ubuntu-latest",
                "steps": steps,
            },
            "deploy": {
                "runs-on": "ubuntu-latest",
                "needs": ["pipeline"],
                "if": "github.event.inputs.environment == 'production'",
                "steps": [
                    {
                        "name": "Deploy to production",
                        "run": "echo 'Deploying generated artifact to production...'",
                    },
                ],
            },
        },
    })
}

/// Render the workflow as YAML text.
pub fn render_workflow(config: &WorkflowConfig) -> Result<String> {
    Ok(serde_yaml::to_string(&workflow_document(config))?)
}

/// Render the workflow and write it to `path`, creating parent directories.
pub fn write_workflow(config: &WorkflowConfig, path: &Path) -> Result<()> {
    let yaml = render_workflow(config)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, yaml)?;
    tracing::info!(path = %path.display(), "workflow written");
    Ok(())
}
