//! Financing calculation routes.
//!
//! Business failures (division by zero, bad group references) are not HTTP
//! errors: the response is 200 with a `null` total and an `error` step.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use civica_core::budget::BudgetVariance;
use civica_core::financing::{FinancingRecord, FinancingService, RecordSummary, TraceEntry};
use civica_shared::{AppError, Currency, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error_response;
use crate::AppState;

/// Creates the financing routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/financing/calculate", post(calculate))
        .route("/financing/calculate/batch", post(calculate_batch))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for a single calculation: the record plus options.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    /// Record to evaluate.
    #[serde(flatten)]
    pub record: FinancingRecord,
    /// Whether to return the step trace. Falls back to configuration.
    #[serde(default)]
    pub include_trace: Option<bool>,
}

/// Request body for a batch calculation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchCalculateRequest {
    /// Records to evaluate.
    pub records: Vec<FinancingRecord>,
    /// Whether to return step traces. Falls back to configuration.
    #[serde(default)]
    pub include_trace: Option<bool>,
}

/// Response for one evaluated record.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    /// Total rounded to 2 places, `null` when undefined.
    pub total: Option<Decimal>,
    /// Total formatted in the configured currency.
    pub formatted_total: Option<String>,
    /// Step trace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<TraceEntry>>,
    /// Variance against the record's budgeted amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_variance: Option<BudgetVariance>,
}

impl CalculationResponse {
    fn new(summary: RecordSummary, currency: Currency) -> Self {
        let total = summary.calculation.total;
        Self {
            total,
            formatted_total: total.map(|amount| Money::new(amount, currency).to_string()),
            steps: summary.calculation.steps,
            budget_variance: summary.budget_variance,
        }
    }
}

/// Response for a batch calculation, in request order.
#[derive(Debug, Serialize)]
pub struct BatchCalculateResponse {
    /// One result per record.
    pub results: Vec<CalculationResponse>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /financing/calculate
async fn calculate(
    State(state): State<AppState>,
    Json(request): Json<CalculateRequest>,
) -> impl IntoResponse {
    let include_trace = request
        .include_trace
        .unwrap_or(state.financing.include_trace_by_default);

    let summary = FinancingService::summarize(&request.record, include_trace);

    match summary.calculation.total {
        Some(total) => info!(
            groups = request.record.groups.len(),
            steps = request.record.final_calculations.len(),
            total = %total,
            "Calculated financing total"
        ),
        None => warn!(
            error = summary.calculation.error_message().unwrap_or_default(),
            "Financing total is undefined"
        ),
    }

    let response = CalculationResponse::new(summary, state.financing.currency);
    (StatusCode::OK, Json(response)).into_response()
}

/// POST /financing/calculate/batch
async fn calculate_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchCalculateRequest>,
) -> impl IntoResponse {
    let limit = state.financing.max_batch_size;
    if request.records.len() > limit {
        return error_response(&AppError::Validation(format!(
            "Batch of {} records exceeds the limit of {limit}",
            request.records.len()
        )));
    }

    let include_trace = request
        .include_trace
        .unwrap_or(state.financing.include_trace_by_default);

    let summaries = FinancingService::summarize_many(&request.records, include_trace);
    let undefined = summaries
        .iter()
        .filter(|summary| !summary.calculation.is_defined())
        .count();
    info!(
        records = summaries.len(),
        undefined, "Calculated financing batch"
    );

    let currency = state.financing.currency;
    let response = BatchCalculateResponse {
        results: summaries
            .into_iter()
            .map(|summary| CalculationResponse::new(summary, currency))
            .collect(),
    };
    (StatusCode::OK, Json(response)).into_response()
}
