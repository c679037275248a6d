//! Calculation results and the step-by-step audit trace.
//!
//! The trace is for display only; nothing downstream does arithmetic on it.
//! Each evaluation owns its own `Trace`, so concurrent calls share nothing.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::error::FinancingError;
use super::types::{AggregateOp, FinalOp};

/// Rounds a reported amount to 2 decimal places.
///
/// Applied only when a value leaves the engine, never during accumulation.
#[must_use]
pub fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount for a trace description.
pub(crate) fn display_amount(value: Decimal) -> String {
    format!("{:.2}", round_amount(value))
}

/// One entry of the audit trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum TraceEntry {
    /// A group's subtotal.
    Group {
        /// Zero-based group index (the value a `groupRef` uses).
        index: usize,
        /// Group title.
        title: String,
        /// Aggregate applied to the group.
        operation: AggregateOp,
        /// Result of folding the items with their operations.
        raw_subtotal: Decimal,
        /// Subtotal after the aggregate.
        subtotal: Decimal,
        /// Human-readable summary.
        description: String,
    },
    /// One final-calculation step.
    Calculation {
        /// 1-based step position.
        step: usize,
        /// Step title.
        title: String,
        /// Step operation.
        operation: FinalOp,
        /// Referenced group for `groupRef` steps.
        #[serde(skip_serializing_if = "Option::is_none")]
        group_reference: Option<usize>,
        /// Operand combined into the running total.
        operand: Decimal,
        /// Running total before this step; absent for the seeding step.
        #[serde(skip_serializing_if = "Option::is_none")]
        previous: Option<Decimal>,
        /// Running total after this step.
        result: Decimal,
        /// Human-readable summary.
        description: String,
    },
    /// Fallback total when no final calculations exist.
    Summary {
        /// Sum of group subtotals.
        total: Decimal,
        /// Human-readable summary.
        description: String,
    },
    /// Resulting total.
    Final {
        /// Total.
        total: Decimal,
        /// Human-readable summary.
        description: String,
    },
    /// Evaluation stopped; the total is undefined.
    Error {
        /// 1-based position of the failing step.
        #[serde(skip_serializing_if = "Option::is_none")]
        step: Option<usize>,
        /// Zero-based index of the failing group.
        #[serde(skip_serializing_if = "Option::is_none")]
        group: Option<usize>,
        /// What went wrong.
        message: String,
    },
    /// Remark about how an input was interpreted.
    Info {
        /// Remark.
        message: String,
    },
}

impl From<&FinancingError> for TraceEntry {
    fn from(error: &FinancingError) -> Self {
        Self::Error {
            step: error.step(),
            group: error.group(),
            message: error.to_string(),
        }
    }
}

/// Output of `compute_financing_total`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// Total rounded to 2 decimal places; `None` when undefined.
    pub total: Option<Decimal>,
    /// Audit trace. Present when requested, and always on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<TraceEntry>>,
}

impl CalculationResult {
    /// Whether the calculation produced a total.
    #[must_use]
    pub const fn is_defined(&self) -> bool {
        self.total.is_some()
    }

    /// The failure message, if evaluation stopped on an error.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.steps.as_deref()?.iter().find_map(|entry| match entry {
            TraceEntry::Error { message, .. } => Some(message.as_str()),
            _ => None,
        })
    }
}

/// Owned trace accumulator for one evaluation.
///
/// Entries are built lazily so a disabled trace costs nothing.
pub(crate) struct Trace {
    enabled: bool,
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub(crate) const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, entry: impl FnOnce() -> TraceEntry) {
        if self.enabled {
            self.entries.push(entry());
        }
    }

    /// Finishes with a defined total.
    pub(crate) fn finish(self, total: Decimal) -> CalculationResult {
        CalculationResult {
            total: Some(round_amount(total)),
            steps: self.enabled.then_some(self.entries),
        }
    }

    /// Finishes with an undefined total. Entries recorded so far stay in
    /// front of the error entry; with tracing off the error is the only entry.
    pub(crate) fn fail(mut self, error: &FinancingError) -> CalculationResult {
        self.entries.push(TraceEntry::from(error));
        CalculationResult {
            total: None,
            steps: Some(self.entries),
        }
    }
}
