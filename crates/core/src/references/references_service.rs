//! Cached catalog resolver with mint-on-miss.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use log::warn;

use crate::aggregation::{LevelScope, Section};
use crate::classification;
use crate::errors::{Error, Result};

use super::references_model::{NewReferenceEntry, ReferenceEntry, ReferenceView, Resolution};
use super::references_traits::{ReferenceRepositoryTrait, ReferenceResolverTrait};

type CacheKey = (Section, String);

/// Resolves classification codes against the reference catalog.
///
/// Lookups go through an in-memory cache; an unknown code is minted into
/// the catalog as an included placeholder with an empty name and the
/// level derived from the code itself, so resolution never fails on
/// well-formed input. A catalog entry's declared level always wins over
/// the derived one.
pub struct ReferenceResolver {
    repository: Arc<dyn ReferenceRepositoryTrait>,
    cache: RwLock<HashMap<CacheKey, ReferenceEntry>>,
}

impl ReferenceResolver {
    pub fn new(repository: Arc<dyn ReferenceRepositoryTrait>) -> Self {
        Self {
            repository,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Whether a line at `level` with this code belongs in an output
    /// view: the level scope is checked before any catalog lookup, and
    /// codes without a catalog entry are included by default.
    pub fn is_included(
        &self,
        level: i32,
        section: Section,
        code: &str,
        scope: &LevelScope,
    ) -> Result<bool> {
        if !scope.contains(level) {
            return Ok(false);
        }
        Ok(self
            .cached(section, code)?
            .map(|entry| entry.included)
            .unwrap_or(true))
    }

    /// Inserts or replaces a catalog row, keeping the cache in step.
    pub async fn upsert(&self, entry: NewReferenceEntry) -> Result<ReferenceEntry> {
        classification::validate(&entry.code)?;
        let stored = self.repository.upsert(entry).await?;
        self.cache_insert(stored.clone())?;
        Ok(stored)
    }

    fn cached(&self, section: Section, code: &str) -> Result<Option<ReferenceEntry>> {
        let cache = self
            .cache
            .read()
            .map_err(|_| Error::Unexpected("reference cache lock poisoned".to_string()))?;
        Ok(cache.get(&(section, code.to_string())).cloned())
    }

    fn cache_insert(&self, entry: ReferenceEntry) -> Result<()> {
        let mut cache = self
            .cache
            .write()
            .map_err(|_| Error::Unexpected("reference cache lock poisoned".to_string()))?;
        cache.insert((entry.section, entry.code.clone()), entry);
        Ok(())
    }
}

#[async_trait]
impl ReferenceResolverTrait for ReferenceResolver {
    async fn resolve(&self, section: Section, code: &str) -> Result<Resolution> {
        classification::validate(code)?;

        if let Some(entry) = self.cached(section, code)? {
            return Ok(Resolution {
                entry,
                minted: false,
            });
        }

        // Cache miss. The store enforces at-most-one-insert per
        // (section, code), so a concurrent resolve of the same code
        // yields the same surviving row.
        let outcome = self
            .repository
            .find_or_create(NewReferenceEntry {
                section,
                code: code.to_string(),
                name: String::new(),
                level: classification::derived_level(code),
                included: true,
            })
            .await?;
        if outcome.inserted {
            warn!(
                "code '{}' absent from the '{}' catalog, minted a placeholder entry",
                code,
                section.as_str()
            );
        }
        self.cache_insert(outcome.entry.clone())?;

        Ok(Resolution {
            entry: outcome.entry,
            minted: outcome.inserted,
        })
    }

    async fn preload(&self, section: Section) -> Result<usize> {
        let entries = self.repository.load_entries(section)?;
        let count = entries.len();
        let mut cache = self
            .cache
            .write()
            .map_err(|_| Error::Unexpected("reference cache lock poisoned".to_string()))?;
        for entry in entries {
            cache.insert((entry.section, entry.code.clone()), entry);
        }
        Ok(count)
    }

    fn view(&self) -> Result<ReferenceView> {
        let cache = self
            .cache
            .read()
            .map_err(|_| Error::Unexpected("reference cache lock poisoned".to_string()))?;
        Ok(ReferenceView::new(cache.values().cloned()))
    }
}
