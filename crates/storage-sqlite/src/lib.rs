//! SQLite storage implementation for Fiscus.
//!
//! This crate provides all database-related functionality using Diesel ORM
//! with SQLite. It implements the repository traits defined in `fiscus-core`
//! and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for the reference catalog, the
//!   project/revision registry, and stored budget rows
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place where Diesel dependencies exist; `core` is
//! database-agnostic and works with traits.

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod references;
pub mod revisions;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from fiscus-core for convenience
pub use fiscus_core::errors::{DatabaseError, Error, Result};
