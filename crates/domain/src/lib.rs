//! # Plumage Domain
//!
//! Wire types for the Plumage feature catalog.
//!
//! This crate contains:
//! - Catalog entity types (DataSource, Feature and their attribute records)
//! - Lineage graph types (FeatureLineage, Entity, Relation)
//! - Access-control records (UserRole, Role)
//!
//! ## Architecture
//! - No dependencies on other Plumage crates
//! - Only external dependencies allowed
//! - Pure data structures mirroring the registry's JSON contract

pub mod types;

// Re-export commonly used items
pub use types::*;
