//! Property-based and scenario tests for the financing engine.

use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::subtotal::{apply_group_aggregate, compute_group_subtotal};
use super::total::compute_financing_total;
use super::trace::TraceEntry;
use super::types::{
    AggregateOp, FinalCalculationStep, FinalOp, FinancingRecord, Group, LineItem, Operation,
};

/// Strategy for an amount between -10,000.00 and 10,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a non-zero amount, safe to divide by.
fn nonzero_amount() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2)),
        (1i64..1_000_000i64).prop_map(|cents| Decimal::new(-cents, 2)),
    ]
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        Just(Operation::Add),
        Just(Operation::Subtract),
        Just(Operation::Multiply),
        Just(Operation::Divide),
    ]
}

fn value_aggregate() -> impl Strategy<Value = AggregateOp> {
    prop_oneof![
        Just(AggregateOp::Average),
        Just(AggregateOp::Min),
        Just(AggregateOp::Max),
    ]
}

/// Additive items only, so folds never overflow or divide by zero.
fn additive_item() -> impl Strategy<Value = LineItem> {
    (
        amount(),
        prop_oneof![Just(Operation::Add), Just(Operation::Subtract)],
    )
        .prop_map(|(value, operation)| item(value, operation))
}

fn item(value: Decimal, operation: Operation) -> LineItem {
    LineItem {
        number: None,
        title: String::new(),
        value,
        operation,
    }
}

fn group(subtotal_operation: AggregateOp, items: Vec<LineItem>) -> Group {
    Group {
        title: "Group".to_string(),
        description: None,
        subtotal_operation,
        items,
    }
}

fn step(operation: FinalOp, value: Option<Decimal>, group_reference: Option<i64>) -> FinalCalculationStep {
    FinalCalculationStep {
        number: None,
        title: String::new(),
        operation,
        value,
        group_reference,
    }
}

fn error_entries(steps: &[TraceEntry]) -> Vec<&TraceEntry> {
    steps
        .iter()
        .filter(|entry| matches!(entry, TraceEntry::Error { .. }))
        .collect()
}

/// Scenario A: fold of 100 - 30 with no final calculations.
#[test]
fn test_scenario_sum_group_without_final_calculations() {
    let record = FinancingRecord {
        groups: vec![group(
            AggregateOp::Sum,
            vec![item(dec!(100), Operation::Add), item(dec!(30), Operation::Subtract)],
        )],
        ..FinancingRecord::default()
    };

    assert_eq!(compute_financing_total(&record, false).total, Some(dec!(70)));
}

/// Scenario B: average ignores item operations, (100 + 30) / 2.
#[test]
fn test_scenario_average_group_without_final_calculations() {
    let record = FinancingRecord {
        groups: vec![group(
            AggregateOp::Average,
            vec![item(dec!(100), Operation::Add), item(dec!(30), Operation::Subtract)],
        )],
        ..FinancingRecord::default()
    };

    assert_eq!(compute_financing_total(&record, false).total, Some(dec!(65)));
}

/// Scenario C: a groupRef after the seed adds.
#[test]
fn test_scenario_two_group_references() {
    let record = FinancingRecord {
        groups: vec![
            group(AggregateOp::Sum, vec![item(dec!(100), Operation::Add)]),
            group(AggregateOp::Sum, vec![item(dec!(50), Operation::Add)]),
        ],
        final_calculations: vec![
            step(FinalOp::GroupRef, None, Some(0)),
            step(FinalOp::GroupRef, None, Some(1)),
        ],
        budgeted_amount: None,
    };

    assert_eq!(compute_financing_total(&record, false).total, Some(dec!(150)));
}

/// Scenario D: dividing by zero at step 2 leaves the total undefined.
#[rstest]
#[case(false)]
#[case(true)]
fn test_scenario_division_by_zero(#[case] include_trace: bool) {
    let record = FinancingRecord {
        final_calculations: vec![
            step(FinalOp::Add, Some(dec!(10)), None),
            step(FinalOp::Divide, Some(dec!(0)), None),
        ],
        ..FinancingRecord::default()
    };

    let result = compute_financing_total(&record, include_trace);

    assert_eq!(result.total, None);
    let steps = result.steps.unwrap();
    let errors = error_entries(&steps);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], TraceEntry::Error { step: Some(2), .. }));
}

#[test]
fn test_empty_record_totals_zero() {
    let result = compute_financing_total(&FinancingRecord::default(), true);
    assert_eq!(result.total, Some(Decimal::ZERO));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// `sum` returns exactly the left fold.
    #[test]
    fn prop_sum_aggregate_is_identity(
        items in prop::collection::vec((nonzero_amount(), operation()), 0..8),
    ) {
        let items: Vec<LineItem> = items.into_iter().map(|(v, op)| item(v, op)).collect();
        let g = group(AggregateOp::Sum, items);

        if let Ok(raw) = compute_group_subtotal(&g) {
            prop_assert_eq!(apply_group_aggregate(&g, raw), Ok(raw));
        }
    }

    /// average/min/max depend only on the item values.
    #[test]
    fn prop_value_aggregates_ignore_operations(
        aggregate in value_aggregate(),
        values in prop::collection::vec(amount(), 1..10),
        ops_a in prop::collection::vec(operation(), 10),
        ops_b in prop::collection::vec(operation(), 10),
        raw in amount(),
    ) {
        let with_ops = |ops: &[Operation]| {
            group(
                aggregate,
                values.iter().zip(ops).map(|(&v, &op)| item(v, op)).collect(),
            )
        };

        let a = apply_group_aggregate(&with_ops(&ops_a), raw);
        let b = apply_group_aggregate(&with_ops(&ops_b), Decimal::ZERO);
        prop_assert_eq!(a, b);
    }

    /// Evaluating twice yields the same total.
    #[test]
    fn prop_total_is_idempotent(
        groups in prop::collection::vec(prop::collection::vec(additive_item(), 0..5), 0..4),
        literals in prop::collection::vec((operation(), amount()), 0..6),
    ) {
        let record = FinancingRecord {
            groups: groups.into_iter().map(|items| group(AggregateOp::Sum, items)).collect(),
            final_calculations: literals
                .into_iter()
                .map(|(op, v)| {
                    let final_op = match op {
                        Operation::Add => FinalOp::Add,
                        Operation::Subtract => FinalOp::Subtract,
                        Operation::Multiply => FinalOp::Multiply,
                        Operation::Divide => FinalOp::Divide,
                    };
                    step(final_op, Some(v), None)
                })
                .collect(),
            budgeted_amount: None,
        };

        let first = compute_financing_total(&record, false);
        let second = compute_financing_total(&record, false);
        prop_assert_eq!(first.total, second.total);
    }

    /// Asking for a trace does not change the total.
    #[test]
    fn prop_trace_does_not_change_total(
        groups in prop::collection::vec(prop::collection::vec(additive_item(), 0..5), 1..4),
        aggregates in prop::collection::vec(
            prop_oneof![Just(AggregateOp::Sum), value_aggregate()],
            4,
        ),
        references in prop::collection::vec(0i64..5, 0..5),
    ) {
        let record = FinancingRecord {
            groups: groups
                .into_iter()
                .zip(aggregates)
                .map(|(items, aggregate)| group(aggregate, items))
                .collect(),
            final_calculations: references
                .into_iter()
                .map(|r| step(FinalOp::GroupRef, None, Some(r)))
                .collect(),
            budgeted_amount: None,
        };

        let plain = compute_financing_total(&record, false);
        let traced = compute_financing_total(&record, true);
        prop_assert_eq!(plain.total, traced.total);
        prop_assert!(traced.steps.is_some());
    }

    /// A zero divisor anywhere after the first element yields an undefined total.
    #[test]
    fn prop_division_by_zero_is_undefined(
        prefix in prop::collection::vec(additive_item(), 1..5),
        in_group in any::<bool>(),
        aggregate in prop_oneof![Just(AggregateOp::Sum), value_aggregate()],
    ) {
        let mut items = prefix;
        let mut final_calculations = vec![step(FinalOp::GroupRef, None, Some(0))];
        if in_group {
            items.push(item(Decimal::ZERO, Operation::Divide));
        } else {
            final_calculations.push(step(FinalOp::Divide, Some(Decimal::ZERO), None));
        }
        let record = FinancingRecord {
            groups: vec![group(aggregate, items)],
            final_calculations,
            budgeted_amount: None,
        };

        let result = compute_financing_total(&record, false);

        prop_assert_eq!(result.total, None);
        let steps = result.steps.unwrap_or_default();
        prop_assert_eq!(error_entries(&steps).len(), 1);
    }

    /// Totals are reported with at most 2 decimal places.
    #[test]
    fn prop_total_is_rounded(
        values in prop::collection::vec(nonzero_amount(), 1..6),
        divisor in nonzero_amount(),
    ) {
        let mut final_calculations: Vec<FinalCalculationStep> = values
            .into_iter()
            .map(|v| step(FinalOp::Add, Some(v), None))
            .collect();
        final_calculations.push(step(FinalOp::Divide, Some(divisor), None));
        let record = FinancingRecord {
            final_calculations,
            ..FinancingRecord::default()
        };

        if let Some(total) = compute_financing_total(&record, false).total {
            prop_assert!(total.scale() <= 2);
        }
    }
}
