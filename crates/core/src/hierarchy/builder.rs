//! Tree reconstruction from a flat ordered collection of coded rows.

use std::collections::HashMap;

use crate::aggregation::{LineItem, Section};
use crate::classification;
use crate::errors::{Error, Result, ValidationError};

use super::hierarchy_model::{ClassificationHierarchy, HierarchyNode};

/// Builds the classification hierarchy for one section's line items.
///
/// Each node's parent is the present code with the longest significant
/// prefix that is a structural ancestor; candidates are tried longest
/// first so the nearest ancestor wins, never merely any ancestor. Children
/// lists keep the source collection order because presentation order in
/// the source form is significant.
///
/// Duplicate codes make the prefix relation cyclic under the fixed-width
/// scheme and fail with `UnresolvableHierarchy` carrying the offending
/// codes. Items from a different section fail validation: section
/// isolation is a hierarchy invariant.
pub fn build_hierarchy(
    section: Section,
    items: &[LineItem],
) -> Result<ClassificationHierarchy> {
    for item in items {
        classification::validate(&item.classification_code)?;
        if item.section != section {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "line item '{}' belongs to section '{}', expected '{}'",
                item.classification_code,
                item.section.as_str(),
                section.as_str()
            ))));
        }
    }

    let mut duplicates: Vec<String> = Vec::new();
    let mut by_code: HashMap<&str, usize> = HashMap::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        if by_code
            .insert(item.classification_code.as_str(), idx)
            .is_some()
        {
            duplicates.push(item.classification_code.clone());
        }
    }
    if !duplicates.is_empty() {
        duplicates.sort();
        duplicates.dedup();
        return Err(Error::UnresolvableHierarchy { codes: duplicates });
    }

    // Candidate parents, longest significant prefix first.
    let mut candidates: Vec<&str> = by_code.keys().copied().collect();
    candidates.sort_by(|a, b| {
        classification::significant_prefix_len(b)
            .cmp(&classification::significant_prefix_len(a))
            .then_with(|| a.cmp(b))
    });

    let mut nodes: HashMap<String, HierarchyNode> = HashMap::with_capacity(items.len());
    let mut roots: Vec<String> = Vec::new();
    let mut order: Vec<String> = Vec::with_capacity(items.len());

    for (idx, item) in items.iter().enumerate() {
        let code = item.classification_code.as_str();
        let parent = candidates
            .iter()
            .copied()
            .find(|candidate| classification::is_ancestor(candidate, code))
            .map(|p| p.to_string());

        nodes.insert(
            code.to_string(),
            HierarchyNode {
                code: code.to_string(),
                item: idx,
                parent: parent.clone(),
                children: Vec::new(),
            },
        );
        order.push(code.to_string());

        match parent {
            Some(_) => {}
            None => roots.push(code.to_string()),
        }
    }

    // Second pass keeps children in source order regardless of where the
    // parent itself appears in the collection.
    for item in items {
        let code = item.classification_code.as_str();
        let parent = nodes.get(code).and_then(|n| n.parent.clone());
        if let Some(parent_code) = parent {
            if let Some(parent_node) = nodes.get_mut(&parent_code) {
                parent_node.children.push(code.to_string());
            }
        }
    }

    Ok(ClassificationHierarchy::new(section, nodes, roots, order))
}
