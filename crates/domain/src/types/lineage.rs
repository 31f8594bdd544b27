//! Lineage graph types
//!
//! The registry answers lineage queries with a guid-keyed entity map plus a
//! flat relation list. The map mixes every entity kind (projects, sources,
//! anchors, features), so entity attributes stay loosely typed here; the
//! strongly typed records in [`super::catalog`] cover the homogeneous
//! endpoints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::EntityType;

/// Edge kinds of the lineage graph. Wire names are the variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationshipType {
    BelongsTo,
    Contains,
    Consumes,
    Produces,
}

/// A directed edge between two catalog entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub relationship_id: Uuid,
    pub from_entity_id: Uuid,
    pub to_entity_id: Uuid,
    pub relationship_type: RelationshipType,
}

/// A lineage graph node of any entity kind.
///
/// `lastModifiedTS` is a string on the wire (the registry serializes its
/// version counter that way).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub guid: Uuid,
    #[serde(
        default,
        rename = "lastModifiedTS",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_modified_ts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub display_text: String,
    pub type_name: EntityType,
    #[serde(default)]
    pub attributes: serde_json::Value,
}

impl Entity {
    /// Qualified name from the loosely typed attribute record, when present.
    #[must_use]
    pub fn qualified_name(&self) -> Option<&str> {
        self.attributes.get("qualifiedName").and_then(serde_json::Value::as_str)
    }
}

/// Lineage query result: every reachable entity plus the edges between them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureLineage {
    pub guid_entity_map: HashMap<Uuid, Entity>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl FeatureLineage {
    /// Look up a node by guid.
    #[must_use]
    pub fn entity(&self, guid: &Uuid) -> Option<&Entity> {
        self.guid_entity_map.get(guid)
    }

    /// All nodes of one entity kind, in no particular order.
    #[must_use]
    pub fn entities_of_type(&self, entity_type: EntityType) -> Vec<&Entity> {
        self.guid_entity_map.values().filter(|e| e.type_name == entity_type).collect()
    }
}
