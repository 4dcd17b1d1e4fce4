//! Catalog listing.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use scpi_core::data::Product;
use scpi_core::traits::ProductCatalog;

use super::{OutputFormat, load_catalog};

/// Arguments for the products command
#[derive(Parser)]
pub struct ProductsArgs {
    /// Configuration file whose `catalog` section replaces the demo products
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,
}

/// Run the products command.
pub fn run(args: &ProductsArgs) -> Result<()> {
    let products = load_catalog(args.catalog.as_deref())?.list()?;

    let output = match args.output {
        OutputFormat::Json => serde_json::to_string_pretty(&products)?,
        OutputFormat::Table => products_to_table(&products),
    };
    println!("{output}");

    Ok(())
}

fn products_to_table(products: &[Product]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>6}  {:<24} {:>8}", "ID", "Name", "Yield");
    for product in products {
        let _ = writeln!(
            out,
            "{:>6}  {:<24} {:>8}",
            product.id,
            product.name,
            product.annual_yield.to_string()
        );
    }
    let _ = write!(out, "{} product(s)", products.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_products_table() {
        let products = load_catalog(None).unwrap().list().unwrap();
        let table = products_to_table(&products);

        let alpha = table.find("SCPI Alpha").unwrap();
        let gamma = table.find("SCPI Gamma").unwrap();
        assert!(alpha < gamma);
        assert!(table.contains("5.1%"));
        assert!(table.ends_with("3 product(s)"));
    }

    #[test]
    fn test_products_json_uses_wire_names() {
        let products = load_catalog(None).unwrap().list().unwrap();
        let json = serde_json::to_value(&products).unwrap();
        assert_eq!(json[0]["nom"], "SCPI Alpha");
        assert_eq!(json[0]["tauxRendementAnnuel"], 4.5);
    }
}
