//! CLI for the resilient caller.

mod commands;

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use resilient_core::config;
use resilient_core::retry::{Controller, TracingObserver};

use commands::{run_config, run_fetch, run_proxy};

/// Top-level CLI for the resilient caller.
#[derive(Debug, Parser)]
#[command(name = "resilient")]
#[command(about = "Run HTTP requests under a retry policy", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a URL, retrying transport faults and retryable statuses.
    Fetch(FetchArgs),

    /// Show the proxy URLs a descriptor expands to.
    Proxy {
        /// `ip:port` or `ip:port:login:password`.
        descriptor: String,
    },

    /// Show the config file path and the effective configuration.
    Config,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// HTTP/HTTPS URL to request.
    pub url: String,

    /// Request method.
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Extra request header as `Name: value`. Repeatable.
    #[arg(long = "header", short = 'H', value_name = "K:V")]
    pub headers: Vec<String>,

    /// Request body.
    #[arg(long, short = 'd')]
    pub data: Option<String>,

    /// Maximum number of attempts (overrides config).
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Seconds to wait between attempts (overrides config).
    #[arg(long, value_name = "SECS")]
    pub delay: Option<f64>,

    /// Give up once this many seconds have passed (overrides config).
    #[arg(long, value_name = "SECS")]
    pub max_elapsed: Option<f64>,

    /// Status code to retry on. Repeatable; defaults to 429 and 5xx gateway errors.
    #[arg(long = "retry-status", value_name = "CODE")]
    pub retry_status: Vec<u32>,

    /// Proxy descriptor for this request (overrides config).
    #[arg(long, value_name = "DESCRIPTOR")]
    pub proxy: Option<String>,
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);
        let controller = Controller::with_observer(Arc::new(TracingObserver));

        match cli.command {
            CliCommand::Fetch(args) => run_fetch(&cfg, &controller, &args)?,
            CliCommand::Proxy { descriptor } => run_proxy(&descriptor)?,
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}
