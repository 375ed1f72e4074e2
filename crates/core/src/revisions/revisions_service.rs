//! Revision orchestration: row/item reshaping, level refresh against the
//! catalog, and the full per-revision aggregation pass.

use std::sync::Arc;

use log::{error, warn};

use crate::aggregation::{
    aggregate, AggregationResult, BudgetAmounts, BudgetLevel, BudgetType, DataType, LineItem,
    Section,
};
use crate::deficit::compute_deficit;
use crate::errors::{Error, Result, ValidationError};
use crate::hierarchy::build_hierarchy;
use crate::references::ReferenceResolverTrait;

use super::revisions_model::{
    BudgetRow, NewProject, NewRevision, PassReport, Project, Revision, SectionError,
};
use super::revisions_traits::{BudgetRowRepositoryTrait, RevisionRepositoryTrait};

/// Reassembles line items from their exploded row form.
///
/// Rows must arrive ordered by row index; rows sharing an index form one
/// line item and must agree on its identity fields. Missing column pairs
/// read as zero.
pub fn rows_to_line_items(rows: &[BudgetRow]) -> Result<Vec<LineItem>> {
    let mut items: Vec<LineItem> = Vec::new();
    let mut current_index: Option<i32> = None;

    for row in rows {
        let start_new = current_index != Some(row.row_index);
        if start_new {
            current_index = Some(row.row_index);
            items.push(LineItem {
                classification_code: row.classification_code.clone(),
                indicator_name: row.indicator_name.clone(),
                level: row.level,
                section: row.section,
                approved: BudgetAmounts::ZERO,
                executed: BudgetAmounts::ZERO,
                data_type: row.data_type,
                source_row: row.source_row,
            });
        }

        // Every row is an amount cell, including the group's first.
        let item = items
            .last_mut()
            .ok_or_else(|| Error::Unexpected("row grouping underflow".to_string()))?;
        if item.classification_code != row.classification_code || item.section != row.section {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "row index {} mixes codes '{}' and '{}'",
                row.row_index, item.classification_code, row.classification_code
            ))));
        }
        match row.budget_type {
            BudgetType::Approved => item.approved.set(row.budget_level, row.amount),
            BudgetType::Executed => item.executed.set(row.budget_level, row.amount),
        }
    }

    Ok(items)
}

/// Explodes line items into one row per (budget type, budget level)
/// column pair, indexed by position. The full column grid is always
/// written, zeros included, so reassembly is lossless.
pub fn line_items_to_rows(
    project_id: &str,
    revision_id: &str,
    items: &[LineItem],
) -> Vec<BudgetRow> {
    let mut rows = Vec::with_capacity(items.len() * BudgetType::ALL.len() * BudgetLevel::ALL.len());
    for (index, item) in items.iter().enumerate() {
        for budget_type in BudgetType::ALL {
            let amounts = match budget_type {
                BudgetType::Approved => &item.approved,
                BudgetType::Executed => &item.executed,
            };
            for (budget_level, amount) in amounts.iter() {
                rows.push(BudgetRow {
                    project_id: project_id.to_string(),
                    revision_id: revision_id.to_string(),
                    section: item.section,
                    classification_code: item.classification_code.clone(),
                    indicator_name: item.indicator_name.clone(),
                    level: item.level,
                    budget_type,
                    data_type: item.data_type,
                    budget_level,
                    amount,
                    row_index: index as i32,
                    source_row: item.source_row,
                });
            }
        }
    }
    rows
}

/// Coordinates storage, the reference catalog, and the rollup engine
/// for one revision at a time.
pub struct RevisionService {
    budget_rows: Arc<dyn BudgetRowRepositoryTrait>,
    revisions: Arc<dyn RevisionRepositoryTrait>,
    resolver: Arc<dyn ReferenceResolverTrait>,
}

impl RevisionService {
    pub fn new(
        budget_rows: Arc<dyn BudgetRowRepositoryTrait>,
        revisions: Arc<dyn RevisionRepositoryTrait>,
        resolver: Arc<dyn ReferenceResolverTrait>,
    ) -> Self {
        Self {
            budget_rows,
            revisions,
            resolver,
        }
    }

    pub fn list_projects(&self) -> Result<Vec<Project>> {
        self.revisions.list_projects()
    }

    pub async fn create_project(&self, new_project: NewProject) -> Result<Project> {
        self.revisions.create_project(new_project).await
    }

    pub fn list_revisions(&self, project_id: &str) -> Result<Vec<Revision>> {
        self.revisions.list_revisions(project_id)
    }

    pub async fn get_or_create_revision(&self, new_revision: NewRevision) -> Result<Revision> {
        self.revisions.get_or_create_revision(new_revision).await
    }

    /// Loads one section's reported line items, with each item's level
    /// refreshed from the reference catalog. Unknown codes are minted
    /// into the catalog as a side effect.
    pub async fn load_line_items(
        &self,
        revision_id: &str,
        section: Section,
    ) -> Result<Vec<LineItem>> {
        let (items, _minted) = self.load_section(revision_id, section).await?;
        Ok(items)
    }

    async fn load_section(
        &self,
        revision_id: &str,
        section: Section,
    ) -> Result<(Vec<LineItem>, Vec<(Section, String)>)> {
        let rows = self
            .budget_rows
            .load_rows(revision_id, section, DataType::Original)?;
        let mut items = rows_to_line_items(&rows)?;

        let mut minted = Vec::new();
        for item in &mut items {
            let resolution = self
                .resolver
                .resolve(section, &item.classification_code)
                .await?;
            item.level = resolution.entry.level;
            if resolution.minted {
                minted.push((section, item.classification_code.clone()));
            }
        }
        Ok((items, minted))
    }

    /// Stores one section's reported line items, replacing any prior
    /// reported slice for that (revision, section).
    pub async fn import_original(
        &self,
        project_id: &str,
        revision_id: &str,
        section: Section,
        items: &[LineItem],
    ) -> Result<usize> {
        for item in items {
            if item.section != section || item.data_type != DataType::Original {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "item '{}' is not reported '{}' data",
                    item.classification_code,
                    section.as_str()
                ))));
            }
        }
        let rows = line_items_to_rows(project_id, revision_id, items);
        self.budget_rows
            .replace_rows(revision_id, section, DataType::Original, rows)
            .await
    }

    /// Persists one section's computed lines, replacing any prior
    /// computed slice for that (revision, section).
    pub async fn save_computed(
        &self,
        project_id: &str,
        revision_id: &str,
        section: Section,
        result: &AggregationResult,
    ) -> Result<usize> {
        let items: Vec<LineItem> = result
            .lines()
            .iter()
            .filter(|line| line.item.section == section)
            .map(|line| line.item.clone())
            .collect();
        let rows = line_items_to_rows(project_id, revision_id, &items);
        self.budget_rows
            .replace_rows(revision_id, section, DataType::Computed, rows)
            .await
    }

    /// Runs the full aggregation pass over every section of a revision.
    ///
    /// Section failures are isolated: a malformed section is reported in
    /// the pass report while the remaining sections still aggregate and
    /// persist. The balance is derived from the merged result when both
    /// the income and expense sections made it through.
    pub async fn run_pass(&self, project_id: &str, revision_id: &str) -> Result<PassReport> {
        let mut report = PassReport::default();

        for section in Section::ALL {
            match self.run_section(project_id, revision_id, section).await {
                Ok(Some((result, minted))) => {
                    report.result.merge(result);
                    report.minted_codes.extend(minted);
                }
                Ok(None) => {}
                Err(err) => {
                    error!(
                        "section '{}' of revision '{}' failed to aggregate: {}",
                        section.as_str(),
                        revision_id,
                        err
                    );
                    report.section_errors.push(SectionError {
                        section,
                        message: err.to_string(),
                    });
                }
            }
        }

        report.deficit = match compute_deficit(&report.result) {
            Ok(deficit) => Some(deficit),
            Err(Error::TotalRowMissing { code }) => {
                warn!(
                    "no balance for revision '{}': total row '{}' absent",
                    revision_id, code
                );
                None
            }
            Err(err) => return Err(err),
        };

        Ok(report)
    }

    async fn run_section(
        &self,
        project_id: &str,
        revision_id: &str,
        section: Section,
    ) -> Result<Option<(AggregationResult, Vec<(Section, String)>)>> {
        let (items, minted) = self.load_section(revision_id, section).await?;
        if items.is_empty() {
            return Ok(None);
        }

        let hierarchy = build_hierarchy(section, &items)?;
        let result = aggregate(&hierarchy, &items)?;
        self.save_computed(project_id, revision_id, section, &result)
            .await?;
        Ok(Some((result, minted)))
    }
}
