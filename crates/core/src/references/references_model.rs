//! Reference classification catalog models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::aggregation::Section;

/// One catalog row describing a classification code: its display name,
/// declared hierarchy level, and whether output views show it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntry {
    pub id: String,
    pub section: Section,
    pub code: String,
    pub name: String,
    /// Declared level; wins over the level derived from code structure.
    pub level: i32,
    pub included: bool,
}

/// Catalog row as supplied by a caller or minted by the resolver; the
/// store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReferenceEntry {
    pub section: Section,
    pub code: String,
    pub name: String,
    pub level: i32,
    pub included: bool,
}

/// Outcome of a find-or-create against the catalog store.
#[derive(Debug, Clone, PartialEq)]
pub struct MintOutcome {
    pub entry: ReferenceEntry,
    /// True when the call inserted a new row; false when a row for the
    /// (section, code) pair already existed.
    pub inserted: bool,
}

/// Outcome of resolving a code against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub entry: ReferenceEntry,
    /// True when the code was unknown and a placeholder entry was minted.
    pub minted: bool,
}

/// Immutable point-in-time snapshot of the catalog, keyed by
/// (section, code) for view filtering.
#[derive(Debug, Clone, Default)]
pub struct ReferenceView {
    entries: HashMap<(Section, String), ReferenceEntry>,
}

impl ReferenceView {
    pub fn new(entries: impl IntoIterator<Item = ReferenceEntry>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|e| ((e.section, e.code.clone()), e))
                .collect(),
        }
    }

    pub fn get(&self, section: Section, code: &str) -> Option<&ReferenceEntry> {
        self.entries.get(&(section, code.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
