//! # SCPI Server
//!
//! HTTP server for the SCPI portfolio simulator.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! scpi-server
//!
//! # Run with a configuration file
//! scpi-server --config /path/to/config.yaml
//!
//! # Run with environment variable overrides
//! SCPI_SERVER_PORT=9090 SCPI_JWT_SECRET=... scpi-server
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use scpi_core::config::{Configurable, Validatable};
use scpi_server::config::ENV_PREFIX;
use scpi_server::{ScpiServer, ServerConfig};

/// SCPI portfolio simulator server
#[derive(Parser, Debug)]
#[command(name = "scpi-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML, TOML or JSON)
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Override server host
    #[arg(long)]
    host: Option<String>,

    /// Override server port
    #[arg(long)]
    port: Option<u16>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,

    /// List the environment variables read at startup and exit
    #[arg(long)]
    list_env: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.list_env {
        for name in ServerConfig::env_var_names(ENV_PREFIX) {
            println!("{name}");
        }
        return Ok(());
    }

    let config = load_config(&args)?;

    if args.validate {
        println!("Configuration is valid");
        return Ok(());
    }

    let mut server = ScpiServer::new(config);
    server.initialize().await?;
    server.run().await?;

    Ok(())
}

/// Loads the file, then applies environment and command-line overrides.
fn load_config(args: &Args) -> Result<ServerConfig> {
    if !args.config.exists() {
        eprintln!(
            "Configuration file not found: {}, using defaults",
            args.config.display()
        );
    }

    let mut config = ServerConfig::load(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    if let Some(host) = &args.host {
        config.api.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if args.debug {
        config.logging.level = "debug".to_string();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
