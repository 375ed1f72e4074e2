use chrono::NaiveDateTime;
use diesel::prelude::*;

use fiscus_core::aggregation::{BudgetLevel, BudgetType, DataType, Section};
use fiscus_core::errors::Error;
use fiscus_core::revisions::{BudgetRow, Project, Revision};

use crate::schema::{budget_rows, projects, revisions};

#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProjectDB {
    pub id: String,
    pub name: String,
    pub created_at: NaiveDateTime,
}

impl From<ProjectDB> for Project {
    fn from(db: ProjectDB) -> Self {
        Project {
            id: db.id,
            name: db.name,
            created_at: db.created_at,
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
#[diesel(table_name = revisions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RevisionDB {
    pub id: String,
    pub project_id: String,
    pub label: String,
    pub created_at: NaiveDateTime,
}

impl From<RevisionDB> for Revision {
    fn from(db: RevisionDB) -> Self {
        Revision {
            id: db.id,
            project_id: db.project_id,
            label: db.label,
            created_at: db.created_at,
        }
    }
}

/// Database representation of one stored amount cell. Enums are stored
/// as their canonical strings.
#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
#[diesel(table_name = budget_rows)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BudgetRowDB {
    pub id: String,
    pub project_id: String,
    pub revision_id: String,
    pub section: String,
    pub classification_code: String,
    pub indicator_name: String,
    pub level: i32,
    pub budget_type: String,
    pub data_type: String,
    pub budget_level: String,
    pub amount: f64,
    pub row_index: i32,
    pub source_row: Option<i64>,
}

impl BudgetRowDB {
    pub fn from_domain(id: String, row: BudgetRow) -> Self {
        Self {
            id,
            project_id: row.project_id,
            revision_id: row.revision_id,
            section: row.section.as_str().to_string(),
            classification_code: row.classification_code,
            indicator_name: row.indicator_name,
            level: row.level,
            budget_type: row.budget_type.as_str().to_string(),
            data_type: row.data_type.as_str().to_string(),
            budget_level: row.budget_level.as_str().to_string(),
            amount: row.amount,
            row_index: row.row_index,
            source_row: row.source_row,
        }
    }
}

impl TryFrom<BudgetRowDB> for BudgetRow {
    type Error = Error;

    fn try_from(db: BudgetRowDB) -> Result<Self, Self::Error> {
        Ok(BudgetRow {
            project_id: db.project_id,
            revision_id: db.revision_id,
            section: db.section.parse::<Section>()?,
            classification_code: db.classification_code,
            indicator_name: db.indicator_name,
            level: db.level,
            budget_type: db.budget_type.parse::<BudgetType>()?,
            data_type: db.data_type.parse::<DataType>()?,
            budget_level: db.budget_level.parse::<BudgetLevel>()?,
            amount: db.amount,
            row_index: db.row_index,
            source_row: db.source_row,
        })
    }
}
