use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use fiscus_core::aggregation::{DataType, Section};
use fiscus_core::revisions::{
    BudgetRow, BudgetRowRepositoryTrait, NewProject, NewRevision, Project, Revision,
    RevisionRepositoryTrait,
};
use fiscus_core::Result;

use super::model::{BudgetRowDB, ProjectDB, RevisionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{budget_rows, projects, revisions};

// Keeps each batched INSERT under SQLite's bound-variable limit.
const INSERT_CHUNK: usize = 1000;

pub struct RevisionRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl RevisionRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        RevisionRepository { pool, writer }
    }
}

#[async_trait]
impl RevisionRepositoryTrait for RevisionRepository {
    fn list_projects(&self) -> Result<Vec<Project>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = projects::table
            .order(projects::created_at.asc())
            .load::<ProjectDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn create_project(&self, new_project: NewProject) -> Result<Project> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Project> {
                let db = ProjectDB {
                    id: Uuid::new_v4().to_string(),
                    name: new_project.name,
                    created_at: Utc::now().naive_utc(),
                };
                diesel::insert_into(projects::table)
                    .values(&db)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(Project::from(db))
            })
            .await
    }

    fn list_revisions(&self, project_id: &str) -> Result<Vec<Revision>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = revisions::table
            .filter(revisions::project_id.eq(project_id))
            .order(revisions::created_at.asc())
            .load::<RevisionDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(Revision::from).collect())
    }

    async fn get_or_create_revision(&self, new_revision: NewRevision) -> Result<Revision> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Revision> {
                let db = RevisionDB {
                    id: Uuid::new_v4().to_string(),
                    project_id: new_revision.project_id,
                    label: new_revision.label,
                    created_at: Utc::now().naive_utc(),
                };

                // UNIQUE(project_id, label): re-submitting a label yields
                // the existing revision.
                diesel::insert_into(revisions::table)
                    .values(&db)
                    .on_conflict((revisions::project_id, revisions::label))
                    .do_nothing()
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let row = revisions::table
                    .filter(revisions::project_id.eq(&db.project_id))
                    .filter(revisions::label.eq(&db.label))
                    .first::<RevisionDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Revision::from(row))
            })
            .await
    }
}

pub struct BudgetRowRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl BudgetRowRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        BudgetRowRepository { pool, writer }
    }
}

#[async_trait]
impl BudgetRowRepositoryTrait for BudgetRowRepository {
    fn load_rows(
        &self,
        revision_id: &str,
        section: Section,
        data_type: DataType,
    ) -> Result<Vec<BudgetRow>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = budget_rows::table
            .filter(budget_rows::revision_id.eq(revision_id))
            .filter(budget_rows::section.eq(section.as_str()))
            .filter(budget_rows::data_type.eq(data_type.as_str()))
            .order((budget_rows::row_index.asc(), budget_rows::id.asc()))
            .load::<BudgetRowDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(BudgetRow::try_from).collect()
    }

    async fn replace_rows(
        &self,
        revision_id: &str,
        section: Section,
        data_type: DataType,
        rows: Vec<BudgetRow>,
    ) -> Result<usize> {
        let revision_id = revision_id.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(
                    budget_rows::table
                        .filter(budget_rows::revision_id.eq(&revision_id))
                        .filter(budget_rows::section.eq(section.as_str()))
                        .filter(budget_rows::data_type.eq(data_type.as_str())),
                )
                .execute(conn)
                .map_err(StorageError::from)?;

                let db_rows: Vec<BudgetRowDB> = rows
                    .into_iter()
                    .map(|row| BudgetRowDB::from_domain(Uuid::new_v4().to_string(), row))
                    .collect();
                let mut written = 0;
                for chunk in db_rows.chunks(INSERT_CHUNK) {
                    written += diesel::insert_into(budget_rows::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(written)
            })
            .await
    }
}
