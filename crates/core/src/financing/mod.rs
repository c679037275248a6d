//! Financing calculation engine.
//!
//! Evaluates a financing record's groups of line items and its ordered
//! final-calculation steps into a single total, optionally with an audit trace.

pub mod error;
pub mod service;
pub mod subtotal;
pub mod total;
pub mod trace;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{ArithmeticError, FinancingError, SubtotalError};
pub use service::{FinancingService, RecordSummary};
pub use subtotal::{apply_group_aggregate, compute_group_subtotal};
pub use total::compute_financing_total;
pub use trace::{CalculationResult, TraceEntry, round_amount};
pub use types::{
    AggregateOp, FinalCalculationStep, FinalOp, FinancingRecord, Group, LineItem, Operation,
    StepKind,
};
