//! # SCPI CLI
//!
//! Command-line interface for the SCPI portfolio simulator.
//!
//! This CLI provides commands for:
//! - Simulating a portfolio from a JSON file
//! - Listing the product catalog
//! - Build information

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

use commands::{products, simulate};

/// SCPI portfolio simulator
#[derive(Parser)]
#[command(name = "scpi")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Simulate the yield of a portfolio file
    Simulate(simulate::SimulateArgs),

    /// List the product catalog
    Products(products::ProductsArgs),

    /// Show version information
    Info,
}

// Logs go to stderr so JSON output can be piped.
fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    match cli.command {
        Commands::Simulate(args) => simulate::run(&args)?,
        Commands::Products(args) => products::run(&args)?,
        Commands::Info => print_info(),
    }

    Ok(())
}

fn print_info() {
    println!("SCPI Portfolio Simulator");
    println!("========================");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Rust Edition: 2024");
    println!();
    println!("Commands:");
    println!("  simulate  Project the income of a portfolio file");
    println!("  products  List the catalog");
    println!();
    println!("Portfolio file format:");
    println!(r#"  {{"portefeuille": [{{"scpiId": 1, "montant": 10000}}]}}"#);
}
