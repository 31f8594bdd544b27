//! Catalog domain types
//!
//! The registry's JSON contract mixes camelCase envelopes with a handful of
//! snake_case attribute keys. Both are contractual; serde renames are applied
//! exactly where the wire diverges from Rust naming and nowhere else.

pub mod access;
pub mod catalog;
pub mod lineage;

pub use access::{Role, UserRole};
pub use catalog::{
    DataSource, EntityRef, EntityType, Feature, FeatureAttributes, FeatureTransformation,
    FeatureType, SourceAttributes, TensorCategory, TypedKey, ValueType, VectorType,
};
pub use lineage::{Entity, FeatureLineage, Relation, RelationshipType};
