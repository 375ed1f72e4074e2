//! Bottom-up recomputation of parent amounts from leaf amounts.

use std::collections::HashMap;

use log::debug;

use crate::constants::{SYNTHETIC_TOTAL_NAME, TOTAL_CODE};
use crate::errors::{Error, Result};
use crate::hierarchy::ClassificationHierarchy;
use crate::utils::{is_value_different, percent_of_plan, round_amount};

use super::aggregation_model::{
    AggregationResult, BudgetAmounts, BudgetLevel, BudgetType, ComputedLine, DataType,
    Discrepancy, LineItem,
};

/// Recomputes every parent amount in one section from its children.
///
/// Leaves keep their reported amounts verbatim. Each internal node's
/// amount per column is the sum of its direct children's recomputed
/// amounts, accumulated in child order and rounded once at the end, so
/// the same collection always yields bit-for-bit identical results.
///
/// Where an internal node carried reported values that disagree with the
/// recomputed rollup beyond tolerance, both values survive: the computed
/// line wins the output and a [`Discrepancy`] records the reported one.
///
/// When no section total row exists, a synthetic one is prepended so the
/// result always carries a grand total per column.
///
/// The hierarchy must have been built from exactly this item collection;
/// a stale or foreign hierarchy fails with `MissingHierarchy`.
pub fn aggregate(
    hierarchy: &ClassificationHierarchy,
    items: &[LineItem],
) -> Result<AggregationResult> {
    if hierarchy.len() != items.len() {
        return Err(Error::MissingHierarchy);
    }
    for item in items {
        if !hierarchy.contains(&item.classification_code) {
            return Err(Error::MissingHierarchy);
        }
    }

    let mut result = AggregationResult::default();
    if items.is_empty() {
        return Ok(result);
    }

    let mut computed: HashMap<String, (BudgetAmounts, BudgetAmounts)> =
        HashMap::with_capacity(items.len());
    for root in hierarchy.roots() {
        rollup(root, hierarchy, items, &mut computed);
    }

    if !hierarchy.contains(TOTAL_CODE) {
        let root_amounts: Vec<_> = hierarchy
            .roots()
            .iter()
            .filter_map(|code| computed.get(code.as_str()).copied())
            .collect();
        let (approved, executed) = sum_in_order(root_amounts.into_iter());
        debug!(
            "section '{}' has no total row, synthesizing one",
            hierarchy.section().as_str()
        );
        push_line(
            &mut result,
            LineItem {
                classification_code: TOTAL_CODE.to_string(),
                indicator_name: SYNTHETIC_TOTAL_NAME.to_string(),
                level: 0,
                section: hierarchy.section(),
                approved,
                executed,
                data_type: DataType::Computed,
                source_row: None,
            },
        );
    }

    for code in hierarchy.order() {
        let node = hierarchy
            .node(code)
            .ok_or(Error::MissingHierarchy)?;
        let original = &items[node.item];
        let (approved, executed) = computed
            .get(code.as_str())
            .copied()
            .ok_or(Error::MissingHierarchy)?;

        if !node.children.is_empty() {
            record_discrepancies(&mut result, original, BudgetType::Approved, approved);
            record_discrepancies(&mut result, original, BudgetType::Executed, executed);
        }

        push_line(
            &mut result,
            LineItem {
                classification_code: original.classification_code.clone(),
                indicator_name: original.indicator_name.clone(),
                level: original.level,
                section: original.section,
                approved,
                executed,
                data_type: DataType::Computed,
                source_row: original.source_row,
            },
        );
    }

    Ok(result)
}

/// Post-order recomputation. Depth is bounded by the code scheme, so
/// recursion is safe.
fn rollup(
    code: &str,
    hierarchy: &ClassificationHierarchy,
    items: &[LineItem],
    computed: &mut HashMap<String, (BudgetAmounts, BudgetAmounts)>,
) -> (BudgetAmounts, BudgetAmounts) {
    // Unknown codes cannot occur here: roots and children both come from
    // the hierarchy itself.
    let node = match hierarchy.node(code) {
        Some(node) => node,
        None => return (BudgetAmounts::ZERO, BudgetAmounts::ZERO),
    };

    let amounts = if node.children.is_empty() {
        let item = &items[node.item];
        (item.approved, item.executed)
    } else {
        let child_amounts: Vec<_> = node
            .children
            .iter()
            .map(|child| rollup(child, hierarchy, items, computed))
            .collect();
        sum_in_order(child_amounts.into_iter())
    };

    computed.insert(code.to_string(), amounts);
    amounts
}

/// Sums per-column in the given order, rounding once per column at the
/// end. Summation order is part of the reproducibility contract.
fn sum_in_order(
    amounts: impl Iterator<Item = (BudgetAmounts, BudgetAmounts)>,
) -> (BudgetAmounts, BudgetAmounts) {
    let mut approved = BudgetAmounts::ZERO;
    let mut executed = BudgetAmounts::ZERO;
    for (child_approved, child_executed) in amounts {
        for level in BudgetLevel::ALL {
            approved.set(level, approved.get(level) + child_approved.get(level));
            executed.set(level, executed.get(level) + child_executed.get(level));
        }
    }
    for level in BudgetLevel::ALL {
        approved.set(level, round_amount(approved.get(level)));
        executed.set(level, round_amount(executed.get(level)));
    }
    (approved, executed)
}

fn record_discrepancies(
    result: &mut AggregationResult,
    original: &LineItem,
    budget_type: BudgetType,
    computed: BudgetAmounts,
) {
    let reported = match budget_type {
        BudgetType::Approved => &original.approved,
        BudgetType::Executed => &original.executed,
    };
    for (level, reported_value) in reported.iter() {
        let computed_value = computed.get(level);
        if is_value_different(reported_value, computed_value) {
            debug!(
                "rollup disagrees with reported value: section={} code={} {}/{} reported={} computed={}",
                original.section.as_str(),
                original.classification_code,
                budget_type.as_str(),
                level.as_str(),
                reported_value,
                computed_value,
            );
            result.push_discrepancy(Discrepancy {
                section: original.section,
                classification_code: original.classification_code.clone(),
                budget_type,
                budget_level: level,
                reported: round_amount(reported_value),
                computed: computed_value,
            });
        }
    }
}

fn push_line(result: &mut AggregationResult, item: LineItem) {
    let mut execution_percent = BudgetAmounts::ZERO;
    for level in BudgetLevel::ALL {
        execution_percent.set(
            level,
            percent_of_plan(item.executed.get(level), item.approved.get(level)),
        );
    }
    result.push(ComputedLine {
        item,
        execution_percent,
    });
}
