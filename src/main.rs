//! balance-batch - batch wallet balance resolver
//!
//! Serves the job API over HTTP

#![allow(missing_docs)]

use balance_batch::Config;
use balance_batch::server::HttpServer;
use balance_batch::utils::logging::init_logging;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "balance-batch", version, about)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "BALANCE_BATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen host
    #[arg(long)]
    host: Option<String>,

    /// Override the listen port
    #[arg(long)]
    port: Option<u16>,
}

async fn run(args: Args) -> balance_batch::Result<()> {
    let mut config = Config::load(args.config.as_deref()).await?;
    if let Some(host) = args.host {
        config.service.server.host = host;
    }
    if let Some(port) = args.port {
        config.service.server.port = port;
    }
    config.validate()?;

    init_logging(config.logging())?;
    info!(
        version = balance_batch::VERSION,
        upstream = %config.lookup().base_url,
        "Starting balance-batch"
    );

    HttpServer::new(&config)?.start().await
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
