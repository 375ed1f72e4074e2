use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use fiscus_core::aggregation::Section;
use fiscus_core::references::{
    MintOutcome, NewReferenceEntry, ReferenceEntry, ReferenceRepositoryTrait,
};
use fiscus_core::Result;

use super::model::ReferenceEntryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::reference_entries;

pub struct ReferenceRepository {
    pool: DbPool,
    writer: WriteHandle,
}

impl ReferenceRepository {
    pub fn new(pool: DbPool, writer: WriteHandle) -> Self {
        ReferenceRepository { pool, writer }
    }
}

#[async_trait]
impl ReferenceRepositoryTrait for ReferenceRepository {
    fn load_entries(&self, section: Section) -> Result<Vec<ReferenceEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = reference_entries::table
            .filter(reference_entries::section.eq(section.as_str()))
            .order(reference_entries::code.asc())
            .load::<ReferenceEntryDB>(&mut conn)
            .map_err(StorageError::from)?;
        rows.into_iter().map(ReferenceEntry::try_from).collect()
    }

    async fn find_or_create(&self, entry: NewReferenceEntry) -> Result<MintOutcome> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<MintOutcome> {
                let db = ReferenceEntryDB::from_new(Uuid::new_v4().to_string(), entry);

                // The UNIQUE(section, code) constraint makes this a no-op
                // when the pair already exists, so concurrent calls insert
                // at most one row between them.
                let inserted = diesel::insert_into(reference_entries::table)
                    .values(&db)
                    .on_conflict((reference_entries::section, reference_entries::code))
                    .do_nothing()
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let row = reference_entries::table
                    .filter(reference_entries::section.eq(&db.section))
                    .filter(reference_entries::code.eq(&db.code))
                    .first::<ReferenceEntryDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(MintOutcome {
                    entry: row.try_into()?,
                    inserted: inserted > 0,
                })
            })
            .await
    }

    async fn upsert(&self, entry: NewReferenceEntry) -> Result<ReferenceEntry> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ReferenceEntry> {
                let db = ReferenceEntryDB::from_new(Uuid::new_v4().to_string(), entry);

                diesel::insert_into(reference_entries::table)
                    .values(&db)
                    .on_conflict((reference_entries::section, reference_entries::code))
                    .do_update()
                    .set((
                        reference_entries::name.eq(db.name.clone()),
                        reference_entries::level.eq(db.level),
                        reference_entries::included.eq(db.included),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let row = reference_entries::table
                    .filter(reference_entries::section.eq(&db.section))
                    .filter(reference_entries::code.eq(&db.code))
                    .first::<ReferenceEntryDB>(conn)
                    .map_err(StorageError::from)?;
                row.try_into()
            })
            .await
    }
}
