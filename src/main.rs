use crate::config::Config;
use crate::console::Console;
use crate::error::Error;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod aircraft;
mod config;
mod console;
mod dataset;
mod error;
mod flight;
mod query;
mod rest;
mod schedule;
mod time;

#[derive(Parser)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Flight CSV to query, overriding the config file
    #[arg(short, long, value_name = "FILE")]
    dataset: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Mode>,
}

#[derive(Subcommand)]
enum Mode {
    /// Serve the HTTP API (default)
    Serve {
        /// Listen address, overriding the config file
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
    /// Explore the dataset in an interactive console
    Console,
}

impl Args {
    fn to_config(&self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(dataset) = &self.dataset {
            config.dataset_path = dataset.clone();
        }
        if let Some(Mode::Serve { addr: Some(addr) }) = &self.command {
            config.addr = *addr;
        }
        Ok(config)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let config = args.to_config()?;
    match args.command.unwrap_or(Mode::Serve { addr: None }) {
        Mode::Serve { .. } => {
            info!("serving flights from {}", config.dataset_path.display());
            let runtime = tokio::runtime::Runtime::new().map_err(|cause| Error::IO {
                message: "Failed to start async runtime".to_string(),
                cause,
            })?;
            runtime.block_on(rest::serve(config))?;
        }
        Mode::Console => Console::new(config)?.run()?,
    }
    Ok(())
}
