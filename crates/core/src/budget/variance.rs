//! Budget variance calculations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::financing::round_amount;

/// Variance status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VarianceStatus {
    /// Actual exceeds the budget.
    OverBudget,
    /// Actual is below the budget.
    UnderBudget,
    /// Actual equals the budget.
    OnBudget,
    /// An input was missing or the computation overflowed.
    Invalid,
}

/// Actual vs budgeted variance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetVariance {
    /// Variance amount (actual - budgeted).
    pub variance: Decimal,
    /// Variance as a percentage of the absolute budget, 2 decimal places.
    pub percentage: Decimal,
    /// Variance status.
    pub status: VarianceStatus,
}

impl BudgetVariance {
    /// The result for unusable inputs.
    #[must_use]
    pub const fn invalid() -> Self {
        Self {
            variance: Decimal::ZERO,
            percentage: Decimal::ZERO,
            status: VarianceStatus::Invalid,
        }
    }

    /// Calculates the variance of `actual` against `budgeted`.
    ///
    /// `None` stands for a value that is not a finite number (for example an
    /// undefined financing total) and gives `VarianceStatus::Invalid`.
    /// A zero budget gives a zero percentage.
    #[must_use]
    pub fn calculate(actual: Option<Decimal>, budgeted: Option<Decimal>) -> Self {
        let (Some(actual), Some(budgeted)) = (actual, budgeted) else {
            return Self::invalid();
        };
        let Some(variance) = actual.checked_sub(budgeted) else {
            return Self::invalid();
        };

        let percentage = if budgeted.is_zero() {
            Some(Decimal::ZERO)
        } else {
            variance
                .checked_div(budgeted.abs())
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(round_amount)
        };
        let Some(percentage) = percentage else {
            return Self::invalid();
        };

        let status = match variance.cmp(&Decimal::ZERO) {
            std::cmp::Ordering::Greater => VarianceStatus::OverBudget,
            std::cmp::Ordering::Less => VarianceStatus::UnderBudget,
            std::cmp::Ordering::Equal => VarianceStatus::OnBudget,
        };

        Self {
            variance,
            percentage,
            status,
        }
    }
}

/// Compares a computed total against a budgeted amount.
///
/// See [`BudgetVariance::calculate`].
#[must_use]
pub fn compute_budget_variance(actual: Option<Decimal>, budgeted: Option<Decimal>) -> BudgetVariance {
    BudgetVariance::calculate(actual, budgeted)
}
