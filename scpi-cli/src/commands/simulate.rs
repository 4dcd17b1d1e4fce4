//! Offline portfolio simulation.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use scpi_core::data::{PortfolioRequest, SimulationResult};
use scpi_core::simulation::simulate_request;
use scpi_core::traits::ProductCatalog;
use scpi_core::types::ProductId;

use super::{OutputFormat, load_catalog};

/// Arguments for the simulate command
#[derive(Parser)]
pub struct SimulateArgs {
    /// Portfolio file, in the JSON format accepted by `POST /api/portfolio`
    #[arg(short, long)]
    pub portfolio: PathBuf,

    /// Configuration file whose `catalog` section replaces the demo products
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

/// Run the simulate command.
pub fn run(args: &SimulateArgs) -> Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let result = simulate_file(&args.portfolio, &catalog)?;

    info!(
        holdings = result.holding_count(),
        total_amount = %result.total_amount,
        "Portfolio simulated"
    );

    let output = match args.output {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Table => results_to_table(&result, &product_names(&catalog)?),
    };
    println!("{output}");

    Ok(())
}

/// Reads a portfolio file and simulates it against `catalog`.
pub fn simulate_file(path: &Path, catalog: &dyn ProductCatalog) -> Result<SimulationResult> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read portfolio file {}", path.display()))?;
    let request: PortfolioRequest =
        serde_json::from_str(&content).context("Invalid portfolio file")?;

    simulate_request(&request, catalog).context("Simulation failed")
}

fn product_names(catalog: &dyn ProductCatalog) -> Result<HashMap<ProductId, String>> {
    Ok(catalog
        .list()?
        .into_iter()
        .map(|product| (product.id, product.name))
        .collect())
}

fn results_to_table(result: &SimulationResult, names: &HashMap<ProductId, String>) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<24} {:>14} {:>8} {:>14}",
        "SCPI", "Amount", "Yield", "Annual income"
    );
    let _ = writeln!(out, "{}", "-".repeat(63));
    for line in &result.line_items {
        let name = names
            .get(&line.product_id)
            .map_or_else(|| format!("#{}", line.product_id), Clone::clone);
        let _ = writeln!(
            out,
            "{:<24} {:>14} {:>8} {:>14}",
            name,
            line.amount.to_string(),
            line.yield_rate.to_string(),
            line.annual_income.to_string()
        );
    }
    let _ = writeln!(out, "{}", "-".repeat(63));
    let _ = writeln!(
        out,
        "{:<24} {:>14} {:>8} {:>14}",
        "Total",
        result.total_amount.to_string(),
        result.average_yield.to_string(),
        result.annual_income.to_string()
    );
    let _ = write!(out, "Monthly income: {}", result.monthly_income);

    out
}
