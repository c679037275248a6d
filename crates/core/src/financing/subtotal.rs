//! Group subtotal calculation.
//!
//! Two separate paths: `compute_group_subtotal` folds items with their own
//! operations, while `apply_group_aggregate` either passes that fold through
//! (`sum`) or discards it and reduces the raw item values (`average`, `min`, `max`).

use rust_decimal::Decimal;

use super::error::SubtotalError;
use super::types::{AggregateOp, Group, LineItem};

/// Folds a group's items left to right.
///
/// The first item seeds the accumulator (see `Operation::seed`); every later
/// item is combined with `Operation::apply`. An empty group folds to zero.
///
/// # Errors
///
/// Returns `SubtotalError::Item` on a zero divisor or overflow. The group's
/// subtotal is then undefined.
pub fn compute_group_subtotal(group: &Group) -> Result<Decimal, SubtotalError> {
    let Some((first, rest)) = group.items.split_first() else {
        return Ok(Decimal::ZERO);
    };

    let seed = first.operation.seed(first.value);
    rest.iter()
        .enumerate()
        .try_fold(seed, |acc, (offset, item)| {
            item.operation
                .apply(acc, item.value)
                .map_err(|source| SubtotalError::Item {
                    position: offset + 2,
                    source,
                })
        })
}

/// Produces the group's final subtotal from its raw fold.
///
/// `sum` returns `raw_subtotal` unchanged. `average`, `min` and `max` ignore it
/// and look only at each item's `value`, disregarding item operations. All three
/// return zero for an empty group.
///
/// # Errors
///
/// Returns `SubtotalError::Aggregate` if averaging overflows.
pub fn apply_group_aggregate(group: &Group, raw_subtotal: Decimal) -> Result<Decimal, SubtotalError> {
    let values = group.items.iter().map(|item| item.value);
    match group.subtotal_operation {
        AggregateOp::Sum => Ok(raw_subtotal),
        AggregateOp::Average => average(&group.items),
        AggregateOp::Min => Ok(values.min().unwrap_or(Decimal::ZERO)),
        AggregateOp::Max => Ok(values.max().unwrap_or(Decimal::ZERO)),
    }
}

fn average(items: &[LineItem]) -> Result<Decimal, SubtotalError> {
    if items.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let overflow = SubtotalError::Aggregate {
        operation: AggregateOp::Average,
    };
    let total = items
        .iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.value))
        .ok_or_else(|| overflow.clone())?;
    total.checked_div(Decimal::from(items.len())).ok_or(overflow)
}
