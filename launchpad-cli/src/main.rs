//! Launchpad CLI
//!
//! Command-line driver for the job resource lifecycle. Resource configuration and
//! state are plain JSON files, so the lifecycle can be exercised without a
//! declarative framework around it.

mod commands;
mod config;
mod output;
mod state;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "launchpad")]
#[command(about = "Launch and track automation platform jobs", long_about = None)]
struct Cli {
    /// Platform URL
    #[arg(long, env = "LAUNCHPAD_HOST", default_value = "http://localhost:8043")]
    host: String,

    /// Path prefix of the versioned API
    #[arg(
        long,
        env = "LAUNCHPAD_API_ENDPOINT",
        default_value = launchpad_client::DEFAULT_API_ENDPOINT
    )]
    api_endpoint: String,

    /// Username for basic authentication
    #[arg(long, env = "LAUNCHPAD_USERNAME")]
    username: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "LAUNCHPAD_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Bearer token, used instead of username/password when set
    #[arg(long, env = "LAUNCHPAD_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Accept invalid TLS certificates
    #[arg(long, env = "LAUNCHPAD_INSECURE_SKIP_VERIFY")]
    insecure_skip_verify: bool,

    /// Timeout of a single HTTP request, in seconds
    #[arg(long, env = "LAUNCHPAD_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "launchpad=info,launchpad_resource=info,launchpad_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_args(
        cli.host,
        cli.api_endpoint,
        cli.username,
        cli.password,
        cli.token,
        cli.insecure_skip_verify,
        cli.timeout,
    );

    handle_command(cli.command, &config).await
}
