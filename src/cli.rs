//! Command-line interface argument parsing.
//!
//! Every option can also be supplied through the environment variable
//! named next to it, which is how container deployments configure the server.

use crate::fetch::{FetchOptions, DEFAULT_RESOURCE};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// agristat - ask questions about crop production and rainfall
///
/// Examples:
///   agristat serve --port 8080
///   agristat fetch --api-key <KEY> --limit 1000
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Log level filter (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Load the datasets and serve the HTTP API (default)
    Serve(ServeArgs),
    /// Download the crop production dataset from data.gov.in
    Fetch(FetchArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0", env = "HOST")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value = "5000", env = "PORT")]
    pub port: u16,

    /// Crop production CSV
    #[arg(
        long,
        default_value = "data/crop_production_data.csv",
        env = "CROP_CSV",
        value_name = "FILE"
    )]
    pub crop_csv: PathBuf,

    /// IMD subdivision rainfall CSV
    #[arg(
        long,
        default_value = "data/Sub_Division_IMD_2017.csv",
        env = "RAINFALL_CSV",
        value_name = "FILE"
    )]
    pub rainfall_csv: PathBuf,

    /// Directory holding index.html
    #[arg(long, default_value = "static", env = "STATIC_DIR", value_name = "DIR")]
    pub static_dir: PathBuf,
}

impl Default for ServeArgs {
    fn default() -> Self {
        // Parse an empty command line so defaults and env vars apply.
        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            inner: ServeArgs,
        }
        Wrapper::parse_from(["agristat"]).inner
    }
}

impl ServeArgs {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct FetchArgs {
    /// data.gov.in API key
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Resource identifier of the dataset
    #[arg(long, default_value = DEFAULT_RESOURCE)]
    pub resource: String,

    /// Maximum number of records to request
    #[arg(long, value_name = "COUNT")]
    pub limit: Option<usize>,

    /// Output CSV path
    #[arg(
        short,
        long,
        default_value = "data/crop_production_data.csv",
        value_name = "FILE"
    )]
    pub output: PathBuf,
}

impl From<FetchArgs> for FetchOptions {
    fn from(args: FetchArgs) -> Self {
        FetchOptions {
            api_key: args.api_key,
            resource: args.resource,
            limit: args.limit,
            output: args.output,
        }
    }
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The subcommand to run; `serve` when none was given.
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Serve(ServeArgs::default()))
    }
}
