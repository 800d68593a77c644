//! Currency rate endpoints.

use super::{ApiError, AppState};
use crate::currency::domain::{CurrencyRate, RateDocument};
use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use std::sync::Arc;

/// Create currency routes.
#[must_use]
pub(super) fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(all_rates))
        .route("/:code", get(one_rate))
}

/// GET /api/currency - Full rate document.
async fn all_rates(State(state): State<Arc<AppState>>) -> Result<Json<RateDocument>, ApiError> {
    let document = state.currency.get_all().await?;
    Ok(Json(RateDocument::clone(&document)))
}

/// GET /api/currency/:code - Rate for one currency.
async fn one_rate(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<CurrencyRate>, ApiError> {
    let rate = state.currency.get_one(&code).await?;
    Ok(Json(rate))
}
