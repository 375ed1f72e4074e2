//! Fiscus Core - Domain entities, services, and traits.
//!
//! This crate contains the classification hierarchy and aggregation engine
//! for municipal budget execution reports. It is database-agnostic and
//! defines repository traits that are implemented by the
//! `storage-sqlite` crate.

pub mod aggregation;
pub mod classification;
pub mod constants;
pub mod deficit;
pub mod errors;
pub mod hierarchy;
pub mod references;
pub mod revisions;
pub mod utils;

// Re-export common types from the aggregation and hierarchy modules
pub use aggregation::*;
pub use hierarchy::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
