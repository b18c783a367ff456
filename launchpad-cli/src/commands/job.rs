//! Job command handlers
//!
//! Runs the job resource lifecycle against a configuration file and a state
//! file, and fetches the status of arbitrary jobs.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use launchpad_client::AutomationClient;
use launchpad_resource::{JobLifecycle, LifecycleResponse, StandardJobLifecycle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::config::Config;
use crate::output::{print_diagnostics, print_job_details};
use crate::state;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Launch a job for a new resource
    Create {
        /// Resource configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// State file to write
        #[arg(short, long, default_value = "launchpad.state.json")]
        state: PathBuf,
    },
    /// Refresh the stored job from the platform
    Read {
        /// State file to refresh
        #[arg(short, long, default_value = "launchpad.state.json")]
        state: PathBuf,
    },
    /// Launch a new job for a changed resource
    Update {
        /// Resource configuration (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// State file of the existing resource
        #[arg(short, long, default_value = "launchpad.state.json")]
        state: PathBuf,
    },
    /// Remove the resource, running its destroy template if configured
    Delete {
        /// State file of the resource
        #[arg(short, long, default_value = "launchpad.state.json")]
        state: PathBuf,
    },
    /// Show the current status of any job
    Status {
        /// Host-relative job URL (e.g. /api/controller/v2/jobs/42/)
        url: String,
    },
}

/// Handle job commands
///
/// Routes job subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The job command to execute
/// * `config` - The CLI configuration
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = Arc::new(
        config
            .client
            .build_client()
            .context("Invalid platform configuration")?,
    );
    let lifecycle = StandardJobLifecycle::new(client.clone());
    let cancel = cancel_on_ctrl_c();

    match command {
        JobCommands::Create {
            config: config_path,
            state: state_path,
        } => {
            let plan = state::load_config(&config_path)?;
            let response = lifecycle.create(plan, &cancel).await;
            finish(response, &state_path)
        }
        JobCommands::Read { state: state_path } => {
            let stored = state::load_state(&state_path)?;
            let response = lifecycle.read(stored, &cancel).await;
            finish(response, &state_path)
        }
        JobCommands::Update {
            config: config_path,
            state: state_path,
        } => {
            let plan = state::load_config(&config_path)?;
            let prior = state::load_state(&state_path)?;
            let response = lifecycle.update(plan, prior, &cancel).await;
            finish(response, &state_path)
        }
        JobCommands::Delete { state: state_path } => {
            let stored = state::load_state(&state_path)?;
            let response = lifecycle.delete(stored, &cancel).await;
            finish(response, &state_path)
        }
        JobCommands::Status { url } => show_status(&client, &url).await,
    }
}

/// Fetch and display a single job
async fn show_status(client: &AutomationClient, url: &str) -> Result<()> {
    let job = client
        .get_job(url)
        .await
        .with_context(|| format!("Failed to fetch job {}", url))?;

    println!("{}", "Job Status:".bold());
    println!("  URL:       {}", job.url.cyan());
    println!("  Template:  {}", job.job_template);
    println!("  Type:      {}", job.job_type.dimmed());
    println!("  Status:    {}", job.status);
    println!(
        "  Final:     {}",
        if job.status.is_terminal() {
            "yes".green()
        } else {
            "no".yellow()
        }
    );

    Ok(())
}

/// Persist the state change, report diagnostics and fail on errors
fn finish(response: LifecycleResponse, state_path: &Path) -> Result<()> {
    state::apply(state_path, &response.state)?;
    print_diagnostics(&response.diagnostics);

    if let Some(record) = response.record() {
        print_job_details(record);
    }

    if let Some(cleanup) = &response.cleanup_job {
        println!("\n{}", "Destroy job:".bold());
        print_job_details(cleanup);
    }

    if response.diagnostics.has_error() {
        anyhow::bail!(
            "operation failed with {} error(s)",
            response.diagnostics.errors().count()
        );
    }

    Ok(())
}

/// Token that fires on the first Ctrl-C
fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            trigger.cancel();
        }
    });

    token
}
