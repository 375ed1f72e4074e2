//! Hierarchy reconstruction from flat, prefix-coded line items.

mod builder;
mod hierarchy_model;


pub use builder::build_hierarchy;
pub use hierarchy_model::{ClassificationHierarchy, HierarchyNode};
