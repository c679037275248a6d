//! Budget variance analysis.

pub mod variance;


pub use variance::{BudgetVariance, VarianceStatus, compute_budget_variance};
