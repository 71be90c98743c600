//! DevCrew - automated SDLC pipeline CLI
//!
//! The `devcrew` command drives one pipeline run per task and manages the
//! task history.
//!
//! ## Commands
//!
//! - `run`: execute the generate/validate/deploy/summarize pipeline for a task
//! - `history`: list recent tasks
//! - `show`: print the stored summary of a task
//! - `bundle`: re-stage a deploy bundle for a stored task
//! - `workflow`: generate a GitHub Actions workflow for the pipeline

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use devcrew_agents::{
    HeuristicTester, ReportSummarizer, SandboxDeployer, TemplateEngineer,
};
use devcrew_ci::{write_workflow, WorkflowConfig};
use devcrew_core::{
    CapabilitySet, DeploymentOutcome, ExecutionResult, Orchestrator, RunOptions, SummaryRecord,
    TaskRecorder, ValidationReport,
};
use devcrew_store::{SqliteTaskStore, TaskId, TaskStore};

#[derive(Parser)]
#[command(name = "devcrew")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Automated SDLC pipeline: generate, validate, deploy, summarize", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Path to the task database
    #[arg(long, global = true, default_value = ".devcrew/devcrew.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute the pipeline for a single task
    Run {
        /// Task description
        #[arg(short, long)]
        task: String,

        /// Project label recorded with the run
        #[arg(short, long)]
        project: Option<String>,

        /// Check command run against the staged artifact during deployment;
        /// `{artifact}` expands to the staged file path
        #[arg(long = "check-cmd", num_args = 1.., value_name = "CMD")]
        check_cmd: Option<Vec<String>>,

        /// Timeout for the check command, in seconds
        #[arg(long, default_value_t = 60)]
        timeout: u64,

        /// Stage a deploy bundle into this directory after the run
        #[arg(long, value_name = "DIR")]
        bundle: Option<PathBuf>,

        /// Print the full result as JSON instead of the summary report
        #[arg(long)]
        output_json: bool,
    },

    /// List recent tasks
    History {
        /// Maximum number of tasks to list
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Show the stored summary for a task
    Show {
        /// Task ID
        task_id: String,
    },

    /// Stage a deploy bundle for a previously stored task
    Bundle {
        /// Task ID
        #[arg(long = "task-id")]
        task_id: String,

        /// Output directory for the bundle
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,
    },

    /// Generate a GitHub Actions workflow for the pipeline
    Workflow {
        /// Output path
        #[arg(short, long, default_value = ".github/workflows/devcrew.yml")]
        output: PathBuf,
    },
}

fn capabilities(check_cmd: Option<Vec<String>>, timeout: u64) -> CapabilitySet {
    let mut deployer = SandboxDeployer::new().with_timeout_secs(timeout);
    if let Some(cmd) = check_cmd {
        deployer = deployer.with_check_command(cmd);
    }
    CapabilitySet::new(
        Arc::new(TemplateEngineer::new()),
        Arc::new(HeuristicTester::new()),
        Arc::new(deployer),
        Arc::new(ReportSummarizer::new()),
    )
}

#[allow(clippy::too_many_arguments)]
async fn cmd_run(
    store: Arc<dyn TaskStore>,
    task: &str,
    project: Option<String>,
    check_cmd: Option<Vec<String>>,
    timeout: u64,
    bundle: Option<PathBuf>,
    output_json: bool,
) -> Result<bool> {
    let orchestrator = Orchestrator::new(capabilities(check_cmd, timeout));
    let options = RunOptions { project };

    let result = orchestrator
        .execute(task, options)
        .await
        .context("pipeline run failed")?;

    // Persistence faults do not invalidate the computed result.
    let recorder = TaskRecorder::new(store);
    match recorder.persist(&result).await {
        Ok(task_id) => println!("Task stored as {task_id}"),
        Err(e) => devcrew_core::obs::emit_persist_error(&result.run_id, &e),
    }

    if let Some(dir) = bundle {
        let manifest = devcrew_ci::stage_bundle(&result, &dir)
            .with_context(|| format!("failed to stage bundle into {}", dir.display()))?;
        println!("Bundle staged: {}", manifest.metadata.display());
    }

    if output_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("\n{}", result.summary.summary_report);
    }

    Ok(result.success)
}

async fn cmd_history(store: Arc<dyn TaskStore>, limit: usize) -> Result<()> {
    let rows = store.list_tasks(limit).await?;
    if rows.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }
    for row in rows {
        let mut desc: String = row.description.chars().take(60).collect();
        if row.description.chars().count() > 60 {
            desc.push_str("...");
        }
        println!("{}  {}  {}", row.task_id, row.created_at.to_rfc3339(), desc);
    }
    Ok(())
}

async fn cmd_show(store: Arc<dyn TaskStore>, task_id: &str) -> Result<()> {
    let id = TaskId(task_id.to_string());
    match store.fetch_summary(&id).await? {
        Some(summary) => {
            match summary.get("summary_report").and_then(|v| v.as_str()) {
                Some(report) => println!("{report}"),
                None => println!("{}", serde_json::to_string_pretty(&summary)?),
            }
            Ok(())
        }
        None => anyhow::bail!("no summary recorded for task {task_id}"),
    }
}

/// Re-stage a deploy bundle from the store, without re-running the pipeline.
async fn cmd_bundle(
    store: Arc<dyn TaskStore>,
    task_id: &str,
    output: &std::path::Path,
) -> Result<()> {
    let id = TaskId(task_id.to_string());
    let row = store
        .get_task(&id)
        .await?
        .with_context(|| format!("no task {task_id}"))?;
    let artifact = store.fetch_artifact(&id).await?.unwrap_or_default();
    let validation: ValidationReport = match store.fetch_validation(&id).await? {
        Some(value) => serde_json::from_value(value)?,
        None => ValidationReport::failed("no validation recorded"),
    };
    let deployment: DeploymentOutcome = match store.fetch_deployment(&id).await? {
        Some(value) => serde_json::from_value(value)?,
        None => DeploymentOutcome::failed("no deployment recorded"),
    };
    let summary: SummaryRecord = match store.fetch_summary(&id).await? {
        Some(value) => serde_json::from_value(value)?,
        None => anyhow::bail!("no summary recorded for task {task_id}"),
    };

    let result = ExecutionResult {
        run_id: row.task_id.to_string(),
        success: validation.valid && deployment.success,
        description: row.description,
        project: None,
        artifact,
        validation,
        deployment,
        summary,
        history: Vec::new(),
        duration_ms: 0,
    };
    let manifest = devcrew_ci::stage_bundle(&result, output)
        .with_context(|| format!("failed to stage bundle into {}", output.display()))?;
    println!("Bundle staged: {}", manifest.metadata.display());
    Ok(())
}

fn cmd_workflow(output: &std::path::Path) -> Result<()> {
    write_workflow(&WorkflowConfig::default(), output)
        .with_context(|| format!("failed to write workflow to {}", output.display()))?;
    println!("Workflow written to {}", output.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    devcrew_core::init_tracing(cli.json, level);

    let exit_ok = match cli.command {
        Commands::Run {
            task,
            project,
            check_cmd,
            timeout,
            bundle,
            output_json,
        } => {
            let store: Arc<dyn TaskStore> = Arc::new(
                SqliteTaskStore::open(&cli.db).context("failed to open task database")?,
            );
            cmd_run(store, &task, project, check_cmd, timeout, bundle, output_json).await?
        }
        Commands::History { limit } => {
            let store: Arc<dyn TaskStore> = Arc::new(
                SqliteTaskStore::open(&cli.db).context("failed to open task database")?,
            );
            cmd_history(store, limit).await?;
            true
        }
        Commands::Show { task_id } => {
            let store: Arc<dyn TaskStore> = Arc::new(
                SqliteTaskStore::open(&cli.db).context("failed to open task database")?,
            );
            cmd_show(store, &task_id).await?;
            true
        }
        Commands::Bundle { task_id, output } => {
            let store: Arc<dyn TaskStore> = Arc::new(
                SqliteTaskStore::open(&cli.db).context("failed to open task database")?,
            );
            cmd_bundle(store, &task_id, &output).await?;
            true
        }
        Commands::Workflow { output } => {
            cmd_workflow(&output)?;
            true
        }
    };

    if !exit_ok {
        std::process::exit(1);
    }
    Ok(())
}
