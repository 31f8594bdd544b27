//! Catalog entity types
//!
//! Data sources and features as the registry serves them: an entity envelope
//! (`guid`, `displayText`, `typeName`, `attributes`) wrapping a per-kind
//! attribute record. Feature metadata (value types, keys, transformations)
//! follows the registry's tensor-based type system.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Feature type system
// ============================================================================

/// Primitive value type of a feature or key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValueType {
    Unspecified,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    String,
    Bytes,
}

/// Shape family of a feature value. The registry models every feature as a
/// tensor, so this currently has a single variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VectorType {
    Tensor,
}

/// Density of a tensor-valued feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TensorCategory {
    Dense,
    Sparse,
}

/// Full type descriptor of a feature value.
///
/// `dimensionType` lists the value type of each tensor dimension; a scalar
/// feature has no dimensions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureType {
    #[serde(rename = "type")]
    pub vector_type: VectorType,
    pub tensor_category: TensorCategory,
    pub dimension_type: Vec<ValueType>,
    pub val_type: ValueType,
}

impl FeatureType {
    /// Dense scalar of the given value type.
    #[must_use]
    pub fn scalar(val_type: ValueType) -> Self {
        Self {
            vector_type: VectorType::Tensor,
            tensor_category: TensorCategory::Dense,
            dimension_type: Vec::new(),
            val_type,
        }
    }
}

/// Join key of a feature.
///
/// The snake_case keys (`key_column`, `key_column_type`, ...) are part of the
/// registry contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedKey {
    pub key_column: String,
    pub key_column_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_column_alias: Option<String>,
}

impl TypedKey {
    #[must_use]
    pub fn new(key_column: impl Into<String>, key_column_type: ValueType) -> Self {
        Self {
            key_column: key_column.into(),
            key_column_type,
            full_name: None,
            description: None,
            key_column_alias: None,
        }
    }
}

/// How a feature value is produced.
///
/// The registry carries no tag; the three shapes are told apart by their
/// required key (`transform_expr`, `def_expr`, or `name`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureTransformation {
    /// Row-level expression (`transform_expr`).
    Expression { transform_expr: String },
    /// Windowed aggregation (`def_expr` plus optional aggregation settings).
    WindowAggregation {
        def_expr: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        agg_func: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        window: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        group_by: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filter: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<u64>,
    },
    /// Named user-defined function.
    Udf { name: String },
}

impl FeatureTransformation {
    /// Row-level expression transformation.
    #[must_use]
    pub fn expression(transform_expr: impl Into<String>) -> Self {
        Self::Expression { transform_expr: transform_expr.into() }
    }
}

// ============================================================================
// Entity envelope
// ============================================================================

/// Registered entity kinds, named on the wire with a versioned prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    #[serde(rename = "plumage_workspace_v1")]
    Project,
    #[serde(rename = "plumage_source_v1")]
    Source,
    #[serde(rename = "plumage_anchor_v1")]
    Anchor,
    #[serde(rename = "plumage_anchor_feature_v1")]
    AnchorFeature,
    #[serde(rename = "plumage_derived_feature_v1")]
    DerivedFeature,
}

/// Reference to another catalog entity, as embedded in attribute records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub guid: Uuid,
    pub type_name: EntityType,
    #[serde(default)]
    pub unique_attributes: HashMap<String, String>,
}

impl EntityRef {
    /// The referenced entity's qualified name, when the registry included it.
    #[must_use]
    pub fn qualified_name(&self) -> Option<&str> {
        self.unique_attributes.get("qualifiedName").map(String::as_str)
    }
}

// ============================================================================
// Data sources
// ============================================================================

/// Attribute record of a registered data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceAttributes {
    pub qualified_name: String,
    pub name: String,
    /// Source kind as the registry reports it (`hdfs`, `SNOWFLAKE`, ...).
    #[serde(rename = "type")]
    pub source_type: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocessing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_timestamp_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_format: Option<String>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// A data source entity as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSource {
    pub guid: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub display_text: String,
    pub type_name: EntityType,
    pub attributes: SourceAttributes,
}

// ============================================================================
// Features
// ============================================================================

/// Attribute record of an anchor or derived feature.
///
/// `input_anchor_features` / `input_derived_features` (snake_case on the
/// wire) are only populated for derived features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAttributes {
    pub qualified_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub feature_type: FeatureType,
    pub transformation: FeatureTransformation,
    #[serde(default)]
    pub key: Vec<TypedKey>,
    #[serde(
        default,
        rename = "input_anchor_features",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub input_anchor_features: Vec<EntityRef>,
    #[serde(
        default,
        rename = "input_derived_features",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub input_derived_features: Vec<EntityRef>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// A feature entity as returned by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub guid: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub display_text: String,
    pub type_name: EntityType,
    pub attributes: FeatureAttributes,
}

impl Feature {
    /// Fully qualified name (`project__anchor__feature` style).
    #[must_use]
    pub fn qualified_name(&self) -> &str {
        &self.attributes.qualified_name
    }

    #[must_use]
    pub fn is_derived(&self) -> bool {
        self.type_name == EntityType::DerivedFeature
    }
}
