use serde::{Deserialize, Serialize};

use crate::aggregation::BudgetAmounts;

/// Surplus (positive) or deficit (negative) per budget-level column,
/// derived from the income and expense section totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeficitResult {
    pub approved: BudgetAmounts,
    pub executed: BudgetAmounts,
    /// Total-row codes the figures were derived from.
    pub income_code: String,
    pub expense_code: String,
}
