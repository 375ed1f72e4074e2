//! Output-view filtering over an aggregation result.

use std::collections::HashSet;

use crate::constants::TOTAL_CODE;
use crate::references::ReferenceView;

use super::aggregation_model::{AggregationResult, LineItem};

/// The set of hierarchy levels a particular output view shows.
///
/// Different views show different depth ranges, so the set is supplied
/// by the caller rather than hard-coded.
#[derive(Debug, Clone)]
pub struct LevelScope {
    levels: HashSet<i32>,
}

impl LevelScope {
    pub fn new(levels: impl IntoIterator<Item = i32>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
        }
    }

    /// All levels from the root down to and including `max_level`.
    pub fn up_to(max_level: i32) -> Self {
        Self::new(0..=max_level)
    }

    pub fn contains(&self, level: i32) -> bool {
        self.levels.contains(&level)
    }
}

/// Whether one computed line belongs in an output view.
///
/// The section total row is always shown, overriding every other rule.
/// Otherwise the line's level must be in scope and its reference entry,
/// if one exists, must not exclude it. Codes without a reference entry
/// are shown: exclusion is an explicit decision, not a default.
pub fn should_include(item: &LineItem, references: &ReferenceView, scope: &LevelScope) -> bool {
    if item.classification_code == TOTAL_CODE {
        return true;
    }
    if !scope.contains(item.level) {
        return false;
    }
    match references.get(item.section, &item.classification_code) {
        Some(entry) => entry.included,
        None => true,
    }
}

/// Projects an aggregation result down to the lines a view shows,
/// preserving traversal order.
pub fn filter_for_view(
    result: &AggregationResult,
    references: &ReferenceView,
    scope: &LevelScope,
) -> Vec<LineItem> {
    result
        .lines()
        .iter()
        .filter(|line| should_include(&line.item, references, scope))
        .map(|line| line.item.clone())
        .collect()
}
