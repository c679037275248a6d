//! Budget variance routes.

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use civica_core::budget::compute_budget_variance;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::AppState;

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/budgets/variance", post(budget_variance))
}

/// Request body for a variance calculation.
#[derive(Debug, Deserialize)]
pub struct VarianceRequest {
    /// Actual amount; `null` when the total is undefined.
    #[serde(default)]
    pub actual: Option<Decimal>,
    /// Budgeted amount.
    #[serde(default)]
    pub budgeted: Option<Decimal>,
}

/// POST /budgets/variance
async fn budget_variance(Json(request): Json<VarianceRequest>) -> impl IntoResponse {
    let variance = compute_budget_variance(request.actual, request.budgeted);
    info!(status = ?variance.status, "Calculated budget variance");

    (StatusCode::OK, Json(variance))
}
