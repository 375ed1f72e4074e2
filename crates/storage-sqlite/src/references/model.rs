use diesel::prelude::*;

use fiscus_core::aggregation::Section;
use fiscus_core::errors::Error;
use fiscus_core::references::{NewReferenceEntry, ReferenceEntry};

use crate::schema::reference_entries;

/// Database representation of a reference catalog row. Enums are stored
/// as their canonical strings.
#[derive(Queryable, Selectable, Identifiable, Insertable, Debug, Clone)]
#[diesel(table_name = reference_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReferenceEntryDB {
    pub id: String,
    pub section: String,
    pub code: String,
    pub name: String,
    pub level: i32,
    pub included: bool,
}

impl ReferenceEntryDB {
    pub fn from_new(id: String, entry: NewReferenceEntry) -> Self {
        Self {
            id,
            section: entry.section.as_str().to_string(),
            code: entry.code,
            name: entry.name,
            level: entry.level,
            included: entry.included,
        }
    }
}

impl TryFrom<ReferenceEntryDB> for ReferenceEntry {
    type Error = Error;

    fn try_from(db: ReferenceEntryDB) -> Result<Self, Self::Error> {
        Ok(ReferenceEntry {
            id: db.id,
            section: db.section.parse::<Section>()?,
            code: db.code,
            name: db.name,
            level: db.level,
            included: db.included,
        })
    }
}
