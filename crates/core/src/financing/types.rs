//! Financing record data types.
//!
//! These mirror the JSON shape supplied by the records layer. Field names are
//! camelCase on the wire; missing collections deserialize as empty.

use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use super::error::ArithmeticError;

/// Arithmetic operation attached to a line item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Add the value to the running total.
    #[default]
    Add,
    /// Subtract the value from the running total.
    Subtract,
    /// Multiply the running total by the value.
    Multiply,
    /// Divide the running total by the value.
    Divide,
}

impl Operation {
    /// Value the accumulator starts from when this operation is on the first element.
    ///
    /// Only `Subtract` changes the value. `Multiply` and `Divide` have nothing to
    /// combine with yet, so the raw value becomes the seed.
    #[must_use]
    pub fn seed(self, value: Decimal) -> Decimal {
        match self {
            Self::Subtract => -value,
            Self::Add | Self::Multiply | Self::Divide => value,
        }
    }

    /// Combines the running total with `value`.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticError::DivisionByZero` for a zero divisor and
    /// `ArithmeticError::Overflow` when the result leaves `Decimal`'s range.
    pub fn apply(self, acc: Decimal, value: Decimal) -> Result<Decimal, ArithmeticError> {
        let result = match self {
            Self::Add => acc.checked_add(value),
            Self::Subtract => acc.checked_sub(value),
            Self::Multiply => acc.checked_mul(value),
            Self::Divide => {
                if value.is_zero() {
                    return Err(ArithmeticError::DivisionByZero);
                }
                acc.checked_div(value)
            }
        };
        result.ok_or(ArithmeticError::Overflow)
    }

    /// Operator symbol used in trace descriptions.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }
}

/// How a group's items are reduced to a subtotal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateOp {
    /// Left fold of the items using each item's operation.
    #[default]
    Sum,
    /// Arithmetic mean of the raw item values.
    Average,
    /// Smallest raw item value.
    Min,
    /// Largest raw item value.
    Max,
}

impl AggregateOp {
    /// Wire name of the aggregate.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Average => "average",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

impl std::fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads a display ordinal, dropping anything that is not an integer.
fn lenient_ordinal<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Ordinal {
        Integer(i64),
        Other(IgnoredAny),
    }

    Ok(match Ordinal::deserialize(deserializer)? {
        Ordinal::Integer(n) => Some(n),
        Ordinal::Other(_) => None,
    })
}

/// A single budget line inside a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// 1-based display ordinal. Not used for evaluation order.
    #[serde(
        default,
        deserialize_with = "lenient_ordinal",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<i64>,
    /// Line title.
    #[serde(default)]
    pub title: String,
    /// Line amount; 0 when absent.
    #[serde(default)]
    pub value: Decimal,
    /// How the amount combines with the running total.
    #[serde(default)]
    pub operation: Operation,
}

/// A named collection of line items sharing one aggregate operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group title.
    #[serde(default)]
    pub title: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Aggregate used to produce the subtotal.
    #[serde(default)]
    pub subtotal_operation: AggregateOp,
    /// Line items, evaluated in array order.
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// Operation of a final-calculation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FinalOp {
    /// Add `value`.
    Add,
    /// Subtract `value`.
    Subtract,
    /// Multiply by `value`.
    Multiply,
    /// Divide by `value`.
    Divide,
    /// Inject the subtotal of the group at `groupReference`.
    GroupRef,
}

impl FinalOp {
    /// The arithmetic operation behind this step, `None` for `GroupRef`.
    #[must_use]
    pub const fn arithmetic(self) -> Option<Operation> {
        match self {
            Self::Add => Some(Operation::Add),
            Self::Subtract => Some(Operation::Subtract),
            Self::Multiply => Some(Operation::Multiply),
            Self::Divide => Some(Operation::Divide),
            Self::GroupRef => None,
        }
    }
}

/// One operation in the ordered sequence folding groups and literals into a total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalCalculationStep {
    /// 1-based display ordinal.
    #[serde(
        default,
        deserialize_with = "lenient_ordinal",
        skip_serializing_if = "Option::is_none"
    )]
    pub number: Option<i64>,
    /// Step title.
    #[serde(default)]
    pub title: String,
    /// Step operation.
    pub operation: FinalOp,
    /// Literal operand. Ignored for `groupRef`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    /// Zero-based index into the record's groups. Only read for `groupRef`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_reference: Option<i64>,
}

/// What a final-calculation step does, with the irrelevant field dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Apply `operation` with a literal operand.
    Arithmetic {
        /// Operation to apply.
        operation: Operation,
        /// Literal operand (0 when the step has no value).
        operand: Decimal,
    },
    /// Add a group's subtotal. Never subtracts, multiplies or divides.
    GroupRef {
        /// Requested group index, if any.
        reference: Option<i64>,
    },
}

impl FinalCalculationStep {
    /// Classifies the step.
    #[must_use]
    pub fn kind(&self) -> StepKind {
        match self.operation.arithmetic() {
            Some(operation) => StepKind::Arithmetic {
                operation,
                operand: self.value.unwrap_or(Decimal::ZERO),
            },
            None => StepKind::GroupRef {
                reference: self.group_reference,
            },
        }
    }
}

/// The part of a financing record the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingRecord {
    /// Line-item groups.
    #[serde(default)]
    pub groups: Vec<Group>,
    /// Ordered final-calculation steps.
    #[serde(default)]
    pub final_calculations: Vec<FinalCalculationStep>,
    /// Declared budget to compare the total against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budgeted_amount: Option<Decimal>,
}
