use async_trait::async_trait;

use crate::aggregation::{DataType, Section};
use crate::errors::Result;

use super::revisions_model::{BudgetRow, NewProject, NewRevision, Project, Revision};

/// Storage access for stored budget rows.
#[async_trait]
pub trait BudgetRowRepositoryTrait: Send + Sync {
    /// Rows of one (revision, section, data type) slice, ordered by
    /// row index so line items reassemble in form order.
    fn load_rows(
        &self,
        revision_id: &str,
        section: Section,
        data_type: DataType,
    ) -> Result<Vec<BudgetRow>>;

    /// Replaces one (revision, section, data type) slice with the given
    /// rows, atomically. Other slices are untouched.
    async fn replace_rows(
        &self,
        revision_id: &str,
        section: Section,
        data_type: DataType,
        rows: Vec<BudgetRow>,
    ) -> Result<usize>;
}

/// Storage access for the project/revision registry.
#[async_trait]
pub trait RevisionRepositoryTrait: Send + Sync {
    fn list_projects(&self) -> Result<Vec<Project>>;

    async fn create_project(&self, new_project: NewProject) -> Result<Project>;

    fn list_revisions(&self, project_id: &str) -> Result<Vec<Revision>>;

    /// Returns the existing revision for (project, label) or creates it.
    async fn get_or_create_revision(&self, new_revision: NewRevision) -> Result<Revision>;
}
