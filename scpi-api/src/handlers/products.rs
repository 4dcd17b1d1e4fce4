//! SCPI product listing.

use axum::{Json, extract::State};
use std::sync::Arc;
use tracing::Instrument;

use scpi_core::data::Product;
use scpi_telemetry::spans::catalog_span;

use crate::error::{ApiError, ApiResult};
use crate::middleware::Auth;
use crate::state::AppState;

/// List products, ordered by id.
///
/// GET /api/scpis
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Auth(_user): Auth,
) -> ApiResult<Json<Vec<Product>>> {
    async move {
        let products = state
            .catalog
            .list()
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        tracing::debug!(count = products.len(), "Listed products");
        Ok(Json(products))
    }
    .instrument(catalog_span("list"))
    .await
}
