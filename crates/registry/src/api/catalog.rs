//! Catalog port interface
//!
//! Every registry operation the SDK exposes, as one trait. `CatalogClient`
//! is the HTTP implementation; tests and alternative transports implement it
//! the same way.

use async_trait::async_trait;
use plumage_domain::types::{DataSource, Feature, FeatureLineage, Role, UserRole};
use uuid::Uuid;

use crate::errors::Result;

/// Trait for feature-catalog registry operations
#[async_trait]
pub trait FeatureCatalog: Send + Sync {
    /// List the names of all registered projects.
    async fn fetch_projects(&self) -> Result<Vec<String>>;

    /// List the data sources registered under a project.
    async fn fetch_data_sources(&self, project: &str) -> Result<Vec<DataSource>>;

    /// Search a project's features. `keyword` filters by name (empty matches
    /// everything); `page` and `limit` paginate the result.
    async fn fetch_features(
        &self,
        project: &str,
        page: u32,
        limit: u32,
        keyword: &str,
    ) -> Result<Vec<Feature>>;

    /// Fetch a single feature by guid or qualified name.
    async fn fetch_feature(&self, id: &str) -> Result<Feature>;

    /// Fetch the full lineage graph of a project.
    async fn fetch_project_lineages(&self, project: &str) -> Result<FeatureLineage>;

    /// Fetch the lineage graph reachable from one feature.
    async fn fetch_feature_lineages(&self, feature: &str) -> Result<FeatureLineage>;

    /// Register a new feature. Returns the guid the registry assigned.
    async fn create_feature(&self, feature: &Feature) -> Result<Uuid>;

    /// Update the feature stored under `id`. The submitted body's guid is
    /// forced to `id` so the registry never sees a conflicting pair.
    async fn update_feature(&self, feature: &Feature, id: Uuid) -> Result<Uuid>;

    /// List role assignments across the catalog.
    async fn list_user_roles(&self) -> Result<Vec<UserRole>>;

    /// Fetch one user's role assignment.
    async fn get_user_role(&self, user_name: &str) -> Result<UserRole>;

    /// Grant a role.
    async fn add_user_role(&self, role: &Role) -> Result<()>;

    /// Revoke a role. The registry models revocation as a POST, not a
    /// DELETE.
    async fn delete_user_role(&self, role: &Role) -> Result<()>;
}
