use super::*;
use crate::aggregation::{
    aggregate, BudgetAmounts, DataType, LineItem, Section,
};
use crate::errors::Error;
use crate::hierarchy::build_hierarchy;

fn section_items(section: Section, approved_regional: f64, executed_regional: f64) -> Vec<LineItem> {
    vec![LineItem {
        classification_code: "10000000000000000".to_string(),
        indicator_name: "total".to_string(),
        level: 0,
        section,
        approved: BudgetAmounts {
            regional: approved_regional,
            ..BudgetAmounts::ZERO
        },
        executed: BudgetAmounts {
            regional: executed_regional,
            ..BudgetAmounts::ZERO
        },
        data_type: DataType::Original,
        source_row: None,
    }]
}

fn aggregated(section: Section, approved_regional: f64, executed_regional: f64) -> crate::aggregation::AggregationResult {
    let items = section_items(section, approved_regional, executed_regional);
    let hierarchy = build_hierarchy(section, &items).unwrap();
    aggregate(&hierarchy, &items).unwrap()
}

#[test]
fn balance_is_income_minus_expense_per_column() {
    let mut result = aggregated(Section::Income, 1_000_000.0, 950_000.0);
    result.merge(aggregated(Section::Expense, 700_000.0, 980_000.0));

    let deficit = compute_deficit(&result).unwrap();
    assert_eq!(deficit.approved.regional, 300_000.0);
    assert_eq!(deficit.executed.regional, -30_000.0);
    assert_eq!(deficit.approved.consolidated, 0.0);
}

#[test]
fn balance_uses_synthesized_total_rows() {
    // Neither section carried an explicit total row; the engine's
    // synthetic totals feed the balance.
    let mut result = aggregated(Section::Income, 500.0, 250.0);
    result.merge(aggregated(Section::Expense, 200.0, 100.0));

    let deficit = compute_deficit(&result).unwrap();
    assert_eq!(deficit.income_code, "00000000000000000");
    assert_eq!(deficit.expense_code, "00000000000000000");
    assert_eq!(deficit.approved.regional, 300.0);
    assert_eq!(deficit.executed.regional, 150.0);
}

#[test]
fn missing_income_section_is_reported() {
    let result = aggregated(Section::Expense, 700_000.0, 0.0);
    let err = compute_deficit(&result).unwrap_err();
    match err {
        Error::TotalRowMissing { code } => assert!(code.starts_with("income/")),
        other => panic!("expected TotalRowMissing, got {other}"),
    }
}

#[test]
fn missing_expense_section_is_reported() {
    let result = aggregated(Section::Income, 1_000_000.0, 0.0);
    assert!(matches!(
        compute_deficit(&result),
        Err(Error::TotalRowMissing { .. })
    ));
}
