//! Financing service: batch evaluation and record summaries.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::total::compute_financing_total;
use super::trace::CalculationResult;
use super::types::FinancingRecord;
use crate::budget::{BudgetVariance, compute_budget_variance};

/// A record's total together with its variance against the declared budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordSummary {
    /// Calculation result.
    #[serde(flatten)]
    pub calculation: CalculationResult,
    /// Variance of the total against `budgetedAmount`, when the record has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_variance: Option<BudgetVariance>,
}

/// Financing service for business logic.
pub struct FinancingService;

impl FinancingService {
    /// Evaluates many records in parallel. Output order matches input order.
    #[must_use]
    pub fn compute_many(records: &[FinancingRecord], include_trace: bool) -> Vec<CalculationResult> {
        records
            .par_iter()
            .map(|record| compute_financing_total(record, include_trace))
            .collect()
    }

    /// Computes a record's total and, if it declares a budget, the variance.
    ///
    /// The variance is taken against the reported total, already rounded to
    /// 2 decimal places. An undefined total yields an `invalid` variance.
    #[must_use]
    pub fn summarize(record: &FinancingRecord, include_trace: bool) -> RecordSummary {
        let calculation = compute_financing_total(record, include_trace);
        let budget_variance = record
            .budgeted_amount
            .map(|budgeted| compute_budget_variance(calculation.total, Some(budgeted)));

        RecordSummary {
            calculation,
            budget_variance,
        }
    }

    /// `summarize` for many records in parallel. Output order matches input order.
    #[must_use]
    pub fn summarize_many(records: &[FinancingRecord], include_trace: bool) -> Vec<RecordSummary> {
        records
            .par_iter()
            .map(|record| Self::summarize(record, include_trace))
            .collect()
    }
}
