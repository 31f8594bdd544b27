//! Access-control records
//!
//! Role assignments as the registry reports them, plus the request body used
//! by the role-management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A role assignment on a catalog scope (`global`, a project, or an entity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRole {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub scope: String,
    pub user_name: String,
    pub role_name: String,
    pub create_by: String,
    pub create_reason: String,
    pub create_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_time: Option<DateTime<Utc>>,
    /// Permissions granted by the role (`read`, `write`, `manage`).
    #[serde(default)]
    pub access: Vec<String>,
}

impl UserRole {
    /// Whether the assignment is still in force.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.delete_time.is_none()
    }
}

/// Request body for adding or deleting a role assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub scope: String,
    pub user_name: String,
    pub role_name: String,
    pub reason: String,
}

impl Role {
    #[must_use]
    pub fn new(
        scope: impl Into<String>,
        user_name: impl Into<String>,
        role_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            scope: scope.into(),
            user_name: user_name.into(),
            role_name: role_name.into(),
            reason: reason.into(),
        }
    }
}
