//! Final total calculation.

use rust_decimal::Decimal;

use super::error::{ArithmeticError, FinancingError};
use super::subtotal::{apply_group_aggregate, compute_group_subtotal};
use super::trace::{CalculationResult, Trace, TraceEntry, display_amount, round_amount};
use super::types::{
    AggregateOp, FinalCalculationStep, FinancingRecord, Group, Operation, StepKind,
};

/// Evaluated subtotals of one group.
struct GroupSubtotal<'a> {
    title: &'a str,
    subtotal: Decimal,
}

/// Computes a record's total.
///
/// Groups are subtotalled in order. With no final calculations the total is the
/// sum of the group subtotals. Otherwise the steps are folded left to right:
/// step 1 seeds the running total and every later step combines with it. A
/// `groupRef` step always adds the referenced subtotal, whatever its position
/// after the seed.
///
/// Business failures (division by zero, overflow, bad group references) never
/// panic: the result has `total: None` and an `error` entry in `steps`.
/// With `include_trace` the result also lists every intermediate step.
#[must_use]
pub fn compute_financing_total(record: &FinancingRecord, include_trace: bool) -> CalculationResult {
    let mut trace = Trace::new(include_trace);
    match evaluate(record, &mut trace) {
        Ok(Evaluated::Summary(total)) => trace.finish(total),
        Ok(Evaluated::Folded(total)) => {
            trace.record(|| TraceEntry::Final {
                total: round_amount(total),
                description: format!("Final total: {}", display_amount(total)),
            });
            trace.finish(total)
        }
        Err(error) => trace.fail(&error),
    }
}

enum Evaluated {
    Summary(Decimal),
    Folded(Decimal),
}

fn evaluate(record: &FinancingRecord, trace: &mut Trace) -> Result<Evaluated, FinancingError> {
    let groups = subtotal_groups(&record.groups, trace)?;

    let Some((seed_step, rest)) = record.final_calculations.split_first() else {
        let total = groups
            .iter()
            .try_fold(Decimal::ZERO, |acc, group| acc.checked_add(group.subtotal))
            .ok_or(FinancingError::SummaryOverflow)?;
        trace.record(|| TraceEntry::Summary {
            total: round_amount(total),
            description: format!(
                "No final calculations defined; total is the sum of {} group subtotal(s): {}",
                groups.len(),
                display_amount(total)
            ),
        });
        return Ok(Evaluated::Summary(total));
    };

    let mut acc = seed(seed_step, &groups, trace)?;
    for (offset, step) in rest.iter().enumerate() {
        acc = combine(acc, step, offset + 2, &groups, trace)?;
    }
    Ok(Evaluated::Folded(acc))
}

fn subtotal_groups<'a>(
    groups: &'a [Group],
    trace: &mut Trace,
) -> Result<Vec<GroupSubtotal<'a>>, FinancingError> {
    groups
        .iter()
        .enumerate()
        .map(|(index, group)| {
            let undefined = |source| FinancingError::Group {
                group: index,
                title: group.title.clone(),
                source,
            };
            let raw = compute_group_subtotal(group).map_err(undefined)?;
            let subtotal = apply_group_aggregate(group, raw).map_err(undefined)?;

            if group.items.is_empty() {
                trace.record(|| TraceEntry::Info {
                    message: format!("Group {:?} has no items; its subtotal is 0", group.title),
                });
            }
            trace.record(|| TraceEntry::Group {
                index,
                title: group.title.clone(),
                operation: group.subtotal_operation,
                raw_subtotal: round_amount(raw),
                subtotal: round_amount(subtotal),
                description: describe_group(group, raw, subtotal),
            });

            Ok(GroupSubtotal {
                title: &group.title,
                subtotal,
            })
        })
        .collect()
}

fn describe_group(group: &Group, raw: Decimal, subtotal: Decimal) -> String {
    match group.subtotal_operation {
        AggregateOp::Sum => format!(
            "{}: {} item(s) folded to {}",
            group.title,
            group.items.len(),
            display_amount(subtotal)
        ),
        op => format!(
            "{}: {op} of {} item value(s) = {} (folded result {} not used)",
            group.title,
            group.items.len(),
            display_amount(subtotal),
            display_amount(raw)
        ),
    }
}

/// Looks up the subtotal a `groupRef` step points at.
fn referenced<'g, 'a>(
    reference: Option<i64>,
    step: usize,
    groups: &'g [GroupSubtotal<'a>],
) -> Result<(usize, &'g GroupSubtotal<'a>), FinancingError> {
    let reference = reference.ok_or(FinancingError::MissingGroupReference { step })?;
    usize::try_from(reference)
        .ok()
        .and_then(|index| groups.get(index).map(|group| (index, group)))
        .ok_or(FinancingError::InvalidGroupReference {
            step,
            reference,
            available: groups.len(),
        })
}

/// Seeds the running total from step 1.
fn seed(
    step: &FinalCalculationStep,
    groups: &[GroupSubtotal<'_>],
    trace: &mut Trace,
) -> Result<Decimal, FinancingError> {
    match step.kind() {
        StepKind::GroupRef { reference } => {
            let (index, group) = referenced(reference, 1, groups)?;
            let value = group.subtotal;
            trace.record(|| TraceEntry::Calculation {
                step: 1,
                title: step.title.clone(),
                operation: step.operation,
                group_reference: Some(index),
                operand: round_amount(value),
                previous: None,
                result: round_amount(value),
                description: format!(
                    "Start with group {:?} ({})",
                    group.title,
                    display_amount(value)
                ),
            });
            Ok(value)
        }
        StepKind::Arithmetic { operation, operand } => {
            let value = operation.seed(operand);
            if matches!(operation, Operation::Multiply | Operation::Divide) {
                trace.record(|| TraceEntry::Info {
                    message: format!(
                        "Step 1 ({}) has no running total to combine with; its value starts the total",
                        step.title
                    ),
                });
            }
            trace.record(|| TraceEntry::Calculation {
                step: 1,
                title: step.title.clone(),
                operation: step.operation,
                group_reference: None,
                operand: round_amount(operand),
                previous: None,
                result: round_amount(value),
                description: format!("Start with {}", display_amount(value)),
            });
            Ok(value)
        }
    }
}

/// Applies step `position` (1-based, > 1) to the running total.
fn combine(
    acc: Decimal,
    step: &FinalCalculationStep,
    position: usize,
    groups: &[GroupSubtotal<'_>],
    trace: &mut Trace,
) -> Result<Decimal, FinancingError> {
    let failed = |source: ArithmeticError| FinancingError::Step {
        step: position,
        source,
    };

    match step.kind() {
        StepKind::GroupRef { reference } => {
            let (index, group) = referenced(reference, position, groups)?;
            let result = Operation::Add.apply(acc, group.subtotal).map_err(failed)?;
            trace.record(|| TraceEntry::Calculation {
                step: position,
                title: step.title.clone(),
                operation: step.operation,
                group_reference: Some(index),
                operand: round_amount(group.subtotal),
                previous: Some(round_amount(acc)),
                result: round_amount(result),
                description: format!(
                    "{} + group {:?} ({}) = {}",
                    display_amount(acc),
                    group.title,
                    display_amount(group.subtotal),
                    display_amount(result)
                ),
            });
            Ok(result)
        }
        StepKind::Arithmetic { operation, operand } => {
            let result = operation.apply(acc, operand).map_err(failed)?;
            trace.record(|| TraceEntry::Calculation {
                step: position,
                title: step.title.clone(),
                operation: step.operation,
                group_reference: None,
                operand: round_amount(operand),
                previous: Some(round_amount(acc)),
                result: round_amount(result),
                description: format!(
                    "{} {} {} = {}",
                    display_amount(acc),
                    operation.symbol(),
                    display_amount(operand),
                    display_amount(result)
                ),
            });
            Ok(result)
        }
    }
}
