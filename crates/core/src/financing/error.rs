//! Financing calculation error types.
//!
//! None of these escape `compute_financing_total`: they are turned into an
//! `error` trace entry next to an undefined total.

use thiserror::Error;

use super::types::AggregateOp;

/// Failure of a single checked arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    /// Divisor was zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Result does not fit in a `Decimal`.
    #[error("arithmetic overflow")]
    Overflow,
}

/// A group's items could not be reduced to a subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubtotalError {
    /// Folding the item at `position` (1-based) failed.
    #[error("item {position}: {source}")]
    Item {
        /// 1-based position of the item in the group.
        position: usize,
        /// Underlying arithmetic failure.
        #[source]
        source: ArithmeticError,
    },

    /// Computing the aggregate over raw item values overflowed.
    #[error("{operation} of item values overflowed")]
    Aggregate {
        /// Aggregate being computed.
        operation: AggregateOp,
    },
}

/// Business-level failures that make a financing total undefined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinancingError {
    /// A group subtotal could not be computed.
    #[error("Group {group} ({title:?}) is undefined: {source}")]
    Group {
        /// Zero-based group index.
        group: usize,
        /// Group title.
        title: String,
        /// Underlying subtotal failure.
        #[source]
        source: SubtotalError,
    },

    /// A final-calculation step failed arithmetically.
    #[error("Step {step}: {source}")]
    Step {
        /// 1-based step position.
        step: usize,
        /// Underlying arithmetic failure.
        #[source]
        source: ArithmeticError,
    },

    /// A `groupRef` step points outside the groups array.
    #[error("Step {step} references group {reference}, but only {available} group(s) exist")]
    InvalidGroupReference {
        /// 1-based step position.
        step: usize,
        /// Requested zero-based group index.
        reference: i64,
        /// Number of groups in the record.
        available: usize,
    },

    /// A `groupRef` step carries no group index.
    #[error("Step {step} is a group reference without a group index")]
    MissingGroupReference {
        /// 1-based step position.
        step: usize,
    },

    /// Summing group subtotals (no final calculations) overflowed.
    #[error("Sum of group subtotals overflowed")]
    SummaryOverflow,
}

impl FinancingError {
    /// 1-based position of the offending final-calculation step, if any.
    #[must_use]
    pub const fn step(&self) -> Option<usize> {
        match self {
            Self::Step { step, .. }
            | Self::InvalidGroupReference { step, .. }
            | Self::MissingGroupReference { step } => Some(*step),
            Self::Group { .. } | Self::SummaryOverflow => None,
        }
    }

    /// Zero-based index of the offending group, if any.
    #[must_use]
    pub const fn group(&self) -> Option<usize> {
        match self {
            Self::Group { group, .. } => Some(*group),
            _ => None,
        }
    }
}
