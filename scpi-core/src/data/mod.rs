//! Products, holdings and simulation results.
//!
//! Field names follow the JSON contract used by the web client
//! (`scpiId`, `montant`, `rendementMoyen`, ...), while the Rust names
//! describe the domain.

mod holding;
mod product;
mod simulation;

pub use holding::{Holding, HoldingInput, PortfolioRequest};
pub use product::Product;
pub use simulation::{LineItem, SimulationResult};
