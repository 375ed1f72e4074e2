//! Projects, revisions, stored row form, and pass orchestration.

mod revisions_model;
mod revisions_service;
mod revisions_traits;

#[cfg(test)]
mod revisions_service_tests;

pub use revisions_model::{
    BudgetRow, NewProject, NewRevision, PassReport, Project, Revision, SectionError,
};
pub use revisions_service::{line_items_to_rows, rows_to_line_items, RevisionService};
pub use revisions_traits::{BudgetRowRepositoryTrait, RevisionRepositoryTrait};
