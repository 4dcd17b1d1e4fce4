//! Portfolio simulation handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;
use tracing::{Instrument, info};

use scpi_core::data::{PortfolioRequest, SimulationResult};
use scpi_core::simulation::simulate_request;
use scpi_telemetry::spans::simulation_span;

use crate::error::{ApiError, ApiResult};
use crate::middleware::Auth;
use crate::state::AppState;

/// Simulate the yield of a portfolio.
///
/// POST /api/portfolio
///
/// The caller is only needed to authorize the request; the simulation
/// itself does not depend on who asks.
pub async fn simulate_portfolio(
    State(state): State<Arc<AppState>>,
    Auth(user): Auth,
    payload: Result<Json<PortfolioRequest>, JsonRejection>,
) -> ApiResult<Json<SimulationResult>> {
    let Json(request) = payload?;

    let span = simulation_span(user.user_id.value(), request.holdings().len());

    async move {
        let result = simulate_request(&request, state.catalog.as_ref())?;

        info!(
            total_amount = %result.total_amount,
            annual_income = %result.annual_income,
            "Portfolio simulated"
        );

        Ok::<_, ApiError>(Json(result))
    }
    .instrument(span)
    .await
}
