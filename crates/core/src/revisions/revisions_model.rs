//! Project/revision registry and the relational row form of line items.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::aggregation::{AggregationResult, BudgetLevel, BudgetType, DataType, Section};
use crate::deficit::DeficitResult;

/// A named report being worked on, e.g. one municipality's annual form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
}

/// One labeled snapshot of a project's data. Labels are unique per
/// project; re-submitting a label yields the existing revision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub id: String,
    pub project_id: String,
    pub label: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRevision {
    pub project_id: String,
    pub label: String,
}

/// One stored amount cell: a line item exploded to one row per
/// (budget type, budget level) column pair.
///
/// `row_index` groups the rows of one line item and fixes the item
/// order within a section, so reassembly is deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRow {
    pub project_id: String,
    pub revision_id: String,
    pub section: Section,
    pub classification_code: String,
    pub indicator_name: String,
    pub level: i32,
    pub budget_type: BudgetType,
    pub data_type: DataType,
    pub budget_level: BudgetLevel,
    pub amount: f64,
    pub row_index: i32,
    pub source_row: Option<i64>,
}

/// One section that failed during a full aggregation pass. Failures are
/// isolated: other sections still complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionError {
    pub section: Section,
    pub message: String,
}

/// Outcome of a full aggregation pass over one revision.
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    pub result: AggregationResult,
    /// Absent when the income or expense section was empty or failed.
    pub deficit: Option<DeficitResult>,
    /// Codes minted into the reference catalog during this pass.
    pub minted_codes: Vec<(Section, String)>,
    pub section_errors: Vec<SectionError>,
}
