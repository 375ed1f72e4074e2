//! Domain models for budget line items and aggregation results.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{Error, ValidationError};

/// Report section a line item belongs to. Hierarchies never cross sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Income,
    Expense,
    FinancingSources,
    ConsolidatedSettlements,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Income,
        Section::Expense,
        Section::FinancingSources,
        Section::ConsolidatedSettlements,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Income => "income",
            Section::Expense => "expense",
            Section::FinancingSources => "financing_sources",
            Section::ConsolidatedSettlements => "consolidated_settlements",
        }
    }
}

impl std::str::FromStr for Section {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Section::Income),
            "expense" => Ok(Section::Expense),
            "financing_sources" => Ok(Section::FinancingSources),
            "consolidated_settlements" => Ok(Section::ConsolidatedSettlements),
            other => Err(Error::Validation(ValidationError::UnknownVariant(
                other.to_string(),
            ))),
        }
    }
}

/// Contributing government-level column within the approved/executed
/// universes. Declaration order is the canonical summation and
/// serialization order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BudgetLevel {
    Consolidated,
    Regional,
    UrbanDistricts,
    MunicipalDistricts,
    UrbanSettlements,
    RuralSettlements,
    TerritorialFund,
}

impl BudgetLevel {
    pub const ALL: [BudgetLevel; 7] = [
        BudgetLevel::Consolidated,
        BudgetLevel::Regional,
        BudgetLevel::UrbanDistricts,
        BudgetLevel::MunicipalDistricts,
        BudgetLevel::UrbanSettlements,
        BudgetLevel::RuralSettlements,
        BudgetLevel::TerritorialFund,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetLevel::Consolidated => "consolidated",
            BudgetLevel::Regional => "regional",
            BudgetLevel::UrbanDistricts => "urban_districts",
            BudgetLevel::MunicipalDistricts => "municipal_districts",
            BudgetLevel::UrbanSettlements => "urban_settlements",
            BudgetLevel::RuralSettlements => "rural_settlements",
            BudgetLevel::TerritorialFund => "territorial_fund",
        }
    }
}

impl std::str::FromStr for BudgetLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consolidated" => Ok(BudgetLevel::Consolidated),
            "regional" => Ok(BudgetLevel::Regional),
            "urban_districts" => Ok(BudgetLevel::UrbanDistricts),
            "municipal_districts" => Ok(BudgetLevel::MunicipalDistricts),
            "urban_settlements" => Ok(BudgetLevel::UrbanSettlements),
            "rural_settlements" => Ok(BudgetLevel::RuralSettlements),
            "territorial_fund" => Ok(BudgetLevel::TerritorialFund),
            other => Err(Error::Validation(ValidationError::UnknownVariant(
                other.to_string(),
            ))),
        }
    }
}

/// The two parallel value universes of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BudgetType {
    Approved,
    Executed,
}

impl BudgetType {
    pub const ALL: [BudgetType; 2] = [BudgetType::Approved, BudgetType::Executed];

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetType::Approved => "approved",
            BudgetType::Executed => "executed",
        }
    }
}

impl std::str::FromStr for BudgetType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(BudgetType::Approved),
            "executed" => Ok(BudgetType::Executed),
            other => Err(Error::Validation(ValidationError::UnknownVariant(
                other.to_string(),
            ))),
        }
    }
}

/// Distinguishes as-reported values from engine-recomputed rollups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataType {
    Original,
    Computed,
}

impl DataType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Original => "ORIGINAL",
            DataType::Computed => "COMPUTED",
        }
    }
}

impl std::str::FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ORIGINAL" => Ok(DataType::Original),
            "COMPUTED" => Ok(DataType::Computed),
            other => Err(Error::Validation(ValidationError::UnknownVariant(
                other.to_string(),
            ))),
        }
    }
}

/// One amount per budget-level column. A record type rather than a string
/// map so a misspelled or missing column cannot slip through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAmounts {
    pub consolidated: f64,
    pub regional: f64,
    pub urban_districts: f64,
    pub municipal_districts: f64,
    pub urban_settlements: f64,
    pub rural_settlements: f64,
    pub territorial_fund: f64,
}

impl BudgetAmounts {
    pub const ZERO: BudgetAmounts = BudgetAmounts {
        consolidated: 0.0,
        regional: 0.0,
        urban_districts: 0.0,
        municipal_districts: 0.0,
        urban_settlements: 0.0,
        rural_settlements: 0.0,
        territorial_fund: 0.0,
    };

    pub fn get(&self, level: BudgetLevel) -> f64 {
        match level {
            BudgetLevel::Consolidated => self.consolidated,
            BudgetLevel::Regional => self.regional,
            BudgetLevel::UrbanDistricts => self.urban_districts,
            BudgetLevel::MunicipalDistricts => self.municipal_districts,
            BudgetLevel::UrbanSettlements => self.urban_settlements,
            BudgetLevel::RuralSettlements => self.rural_settlements,
            BudgetLevel::TerritorialFund => self.territorial_fund,
        }
    }

    pub fn set(&mut self, level: BudgetLevel, value: f64) {
        match level {
            BudgetLevel::Consolidated => self.consolidated = value,
            BudgetLevel::Regional => self.regional = value,
            BudgetLevel::UrbanDistricts => self.urban_districts = value,
            BudgetLevel::MunicipalDistricts => self.municipal_districts = value,
            BudgetLevel::UrbanSettlements => self.urban_settlements = value,
            BudgetLevel::RuralSettlements => self.rural_settlements = value,
            BudgetLevel::TerritorialFund => self.territorial_fund = value,
        }
    }

    /// Amounts in canonical column order.
    pub fn iter(&self) -> impl Iterator<Item = (BudgetLevel, f64)> + '_ {
        BudgetLevel::ALL.into_iter().map(move |l| (l, self.get(l)))
    }
}

/// One row of budget data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub classification_code: String,
    pub indicator_name: String,
    /// Depth in the classification hierarchy; 0 is the root/total row.
    pub level: i32,
    pub section: Section,
    pub approved: BudgetAmounts,
    pub executed: BudgetAmounts,
    pub data_type: DataType,
    /// Opaque provenance token (originating spreadsheet row); carried
    /// through unchanged, never interpreted by the engine.
    pub source_row: Option<i64>,
}

/// A reported ORIGINAL total that disagrees with the recomputed rollup.
/// Both values are retained; disagreement is data, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    pub section: Section,
    pub classification_code: String,
    pub budget_type: BudgetType,
    pub budget_level: BudgetLevel,
    pub reported: f64,
    pub computed: f64,
}

/// A COMPUTED line together with its derived percent-of-plan values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedLine {
    pub item: LineItem,
    /// executed / approved x 100 per column; 0 where approved is 0.
    pub execution_percent: BudgetAmounts,
}

/// Result of one or more section aggregation passes.
///
/// Holds one COMPUTED line per hierarchy node (synthetic total rows
/// included) in traversal order, indexed by (section, code).
#[derive(Debug, Clone, Default)]
pub struct AggregationResult {
    lines: Vec<ComputedLine>,
    by_key: HashMap<(Section, String), usize>,
    discrepancies: Vec<Discrepancy>,
}

impl AggregationResult {
    pub(crate) fn push(&mut self, line: ComputedLine) {
        let key = (line.item.section, line.item.classification_code.clone());
        self.by_key.insert(key, self.lines.len());
        self.lines.push(line);
    }

    pub(crate) fn push_discrepancy(&mut self, discrepancy: Discrepancy) {
        self.discrepancies.push(discrepancy);
    }

    /// Computed lines in traversal order.
    pub fn lines(&self) -> &[ComputedLine] {
        &self.lines
    }

    pub fn discrepancies(&self) -> &[Discrepancy] {
        &self.discrepancies
    }

    pub fn get(&self, section: Section, code: &str) -> Option<&ComputedLine> {
        self.by_key
            .get(&(section, code.to_string()))
            .map(|&idx| &self.lines[idx])
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Folds another section's result into this one. Sections stay isolated
    /// through the (section, code) key.
    pub fn merge(&mut self, other: AggregationResult) {
        for line in other.lines {
            self.push(line);
        }
        self.discrepancies.extend(other.discrepancies);
    }
}
