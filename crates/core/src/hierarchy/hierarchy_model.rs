//! In-memory tree shape derived from a flat line item collection.

use std::collections::HashMap;

use crate::aggregation::Section;

/// One node of the classification hierarchy.
///
/// Nodes reference each other by code, not by live pointer, so the arena
/// can be cloned and serialized without cycles.
#[derive(Debug, Clone)]
pub struct HierarchyNode {
    pub code: String,
    /// Index of the backing line item in the source collection.
    pub item: usize,
    pub parent: Option<String>,
    /// Direct children in source collection order.
    pub children: Vec<String>,
}

/// A read-only derived view over one section's line item collection.
///
/// Rebuilt on every load; never mutated in place.
#[derive(Debug, Clone)]
pub struct ClassificationHierarchy {
    section: Section,
    nodes: HashMap<String, HierarchyNode>,
    roots: Vec<String>,
    order: Vec<String>,
}

impl ClassificationHierarchy {
    pub(crate) fn new(
        section: Section,
        nodes: HashMap<String, HierarchyNode>,
        roots: Vec<String>,
        order: Vec<String>,
    ) -> Self {
        Self {
            section,
            nodes,
            roots,
            order,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn node(&self, code: &str) -> Option<&HierarchyNode> {
        self.nodes.get(code)
    }

    /// Root codes in source collection order. Multiple roots are normal:
    /// a section's total row and detached top-level rows coexist.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// All codes in source collection order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.nodes.contains_key(code)
    }
}
