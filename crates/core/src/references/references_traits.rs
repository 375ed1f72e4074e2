use async_trait::async_trait;

use crate::aggregation::Section;
use crate::errors::Result;

use super::references_model::{MintOutcome, NewReferenceEntry, ReferenceEntry, ReferenceView, Resolution};

/// Storage access for the reference classification catalog.
#[async_trait]
pub trait ReferenceRepositoryTrait: Send + Sync {
    fn load_entries(&self, section: Section) -> Result<Vec<ReferenceEntry>>;

    /// Inserts the entry unless a row for its (section, code) pair already
    /// exists, and returns the surviving row either way. Concurrent calls
    /// for the same pair must insert at most one row between them.
    async fn find_or_create(&self, entry: NewReferenceEntry) -> Result<MintOutcome>;

    /// Inserts or replaces the catalog row for the entry's (section, code)
    /// pair.
    async fn upsert(&self, entry: NewReferenceEntry) -> Result<ReferenceEntry>;
}

/// Catalog lookups with mint-on-miss semantics.
#[async_trait]
pub trait ReferenceResolverTrait: Send + Sync {
    /// Resolves a code to its catalog entry, minting a placeholder when
    /// the code is unknown. Never fails for a well-formed code.
    async fn resolve(&self, section: Section, code: &str) -> Result<Resolution>;

    /// Warms the cache with one section's catalog, returning the number
    /// of entries loaded.
    async fn preload(&self, section: Section) -> Result<usize>;

    fn view(&self) -> Result<ReferenceView>;
}
