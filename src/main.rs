//! agristat - Crop production & rainfall Q&A service
//!
//! Loads the crop production and IMD rainfall tables once at startup and answers
//! keyword-routed questions about them over HTTP.

mod cli;
mod data;
mod fetch;
mod query;
mod server;
mod stats;

use anyhow::{Context, Result};
use cli::{Args, Command};
use data::DataLoader;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing; `RUST_LOG` directives are extended with the configured level.
fn init_logging(level: &str) {
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(level.parse().unwrap_or(Level::INFO.into())),
        )
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();
    init_logging(&args.log_level);

    info!("agristat v{}", env!("CARGO_PKG_VERSION"));

    match args.command() {
        Command::Serve(serve) => {
            let loader = DataLoader::new(&serve.crop_csv, &serve.rainfall_csv);
            let datasets = tokio::task::spawn_blocking(move || loader.load())
                .await
                .context("Dataset loading task failed")?;

            server::serve(serve.addr(), datasets, serve.static_dir).await
        }
        Command::Fetch(fetch_args) => {
            let rows = fetch::run(&fetch_args.into())
                .await
                .context("Failed to fetch crop production data")?;
            info!("Fetched {} rows", rows);
            Ok(())
        }
    }
}
