//! timeout-floor
//!
//! Command line front end for the request timeout floor.
//!
//! # Architecture Overview
//!
//! ```text
//!     config file ──▶ FloorConfig ──▶ PolicySettings ◀── env overrides
//!                                           │
//!                                   activation gate
//!                                           │
//!                                           ▼
//!     HttpTransport ─ default_timeout ─ request_args ─ pre_dispatch ─▶ network
//!                          ▲                 ▲              ▲            │
//!                          └──── TimeoutPolicy hooks ───────┘            ▼
//!                                                                 debug → diagnostics
//! ```

use clap::{Parser, Subcommand};
use serde_json::json;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use timeout_floor::config::{load_config, EnvOverrides, FloorConfig};
use timeout_floor::lifecycle::{bootstrap, ExecutionContext};
use timeout_floor::observability::{logging, metrics};
use timeout_floor::policy::TracingSink;
use timeout_floor::transport::{RequestOptions, TransportHandle};

#[derive(Parser)]
#[command(name = "timeout-floor")]
#[command(about = "Raise outbound HTTP request timeouts to a configured floor", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Execution context used by the activation gate.
    #[arg(long, default_value = "admin")]
    context: ExecutionContext,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved policy settings
    Show,
    /// Show what each stage does to a default timeout
    Resolve {
        /// Transport default timeout in seconds
        default_secs: f64,
        /// Explicit per-request timeout in seconds
        #[arg(long)]
        request_secs: Option<f64>,
    },
    /// GET a URL through the transport
    Fetch {
        url: String,
        /// Explicit per-request timeout in seconds
        #[arg(long)]
        timeout_secs: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FloorConfig::default(),
    };

    logging::init_logging(&config.observability)?;
    tracing::info!("timeout-floor v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let env = EnvOverrides::from_env();
    let mut boot = bootstrap(&config, cli.context, &[&env], Arc::new(TracingSink))?;

    match cli.command {
        Commands::Show => {
            let out = json!({
                "context": cli.context,
                "active": boot.policy.is_some(),
                "settings": boot.settings,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Resolve {
            default_secs,
            request_secs,
        } => {
            boot.transport = boot
                .transport
                .with_default_timeout(Duration::try_from_secs_f64(default_secs)?);
            let options = RequestOptions {
                timeout: request_secs.map(Duration::try_from_secs_f64).transpose()?,
                ..Default::default()
            };
            let prepared = boot.transport.prepare("GET", "http://localhost/", options)?;
            let out = json!({
                "active": boot.policy.is_some(),
                "default_secs": prepared.default_timeout.as_secs_f64(),
                "args_secs": prepared.args.timeout.as_secs_f64(),
                "connect_secs": prepared.options.connect_timeout().as_secs_f64(),
                "total_secs": prepared.options.total_timeout().as_secs_f64(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Fetch { url, timeout_secs } => {
            let options = RequestOptions {
                timeout: timeout_secs.map(Duration::try_from_secs_f64).transpose()?,
                ..Default::default()
            };
            let response = boot.transport.request("GET", &url, options).await?;
            eprintln!("Status: {}", response.status);
            println!("{}", response.body);
        }
    }

    Ok(())
}
