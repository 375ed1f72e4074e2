//! Cross-section derivation of the budget balance.

use crate::aggregation::{AggregationResult, BudgetAmounts, BudgetLevel, Section};
use crate::constants::TOTAL_CODE;
use crate::errors::{Error, Result};
use crate::utils::round_amount;

use super::deficit_model::DeficitResult;

/// Derives the per-column budget balance: income total minus expense
/// total, in both the approved and executed universes.
///
/// Works off the recomputed total rows of a merged aggregation result,
/// so a balance is available even when a source form omitted one or
/// both total rows (the engine synthesizes them). Fails with
/// `TotalRowMissing` when a required section was never aggregated.
pub fn compute_deficit(result: &AggregationResult) -> Result<DeficitResult> {
    let income = result
        .get(Section::Income, TOTAL_CODE)
        .ok_or_else(|| Error::TotalRowMissing {
            code: format!("{}/{}", Section::Income.as_str(), TOTAL_CODE),
        })?;
    let expense = result
        .get(Section::Expense, TOTAL_CODE)
        .ok_or_else(|| Error::TotalRowMissing {
            code: format!("{}/{}", Section::Expense.as_str(), TOTAL_CODE),
        })?;

    let mut approved = BudgetAmounts::ZERO;
    let mut executed = BudgetAmounts::ZERO;
    for level in BudgetLevel::ALL {
        approved.set(
            level,
            round_amount(income.item.approved.get(level) - expense.item.approved.get(level)),
        );
        executed.set(
            level,
            round_amount(income.item.executed.get(level) - expense.item.executed.get(level)),
        );
    }

    Ok(DeficitResult {
        approved,
        executed,
        income_code: income.item.classification_code.clone(),
        expense_code: expense.item.classification_code.clone(),
    })
}
