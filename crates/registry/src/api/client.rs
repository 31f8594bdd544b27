//! Catalog HTTP client
//!
//! [`CatalogClient`] implements [`FeatureCatalog`] against the registry's
//! REST API. Every request is rooted at `<origin>/api/v1` and carries the
//! identity token as the `code` query parameter, which is how the registry
//! authenticates callers. Responses decode straight into the domain types;
//! the registry wraps nothing in envelopes.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use plumage_domain::types::{DataSource, Feature, FeatureLineage, Role, UserRole};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::auth::IdTokenProvider;
use super::catalog::FeatureCatalog;
use crate::errors::{ApiError, Result};
use crate::http::HttpClient;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Sample role assignments served by `list_user_roles` until the registry
/// grows a listing endpoint.
const USER_ROLE_SAMPLE: &str = include_str!("fixtures/userrole.json");

/// HTTP client for the feature-catalog registry API.
pub struct CatalogClient {
    base_url: String,
    http_client: HttpClient,
    token_provider: Arc<dyn IdTokenProvider>,
}

impl CatalogClient {
    /// Create a client with default transport settings (30 s timeout, three
    /// attempts on retryable failures).
    ///
    /// # Arguments
    /// * `origin` - Scheme and host of the registry (e.g., "http://localhost:8000");
    ///   a trailing slash is tolerated
    /// * `token_provider` - Async provider that yields identity tokens
    ///
    /// # Errors
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(
        origin: impl Into<String>,
        token_provider: Arc<dyn IdTokenProvider>,
    ) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .max_attempts(3)
            .build()?;

        Ok(Self::with_http_client(origin, http_client, token_provider))
    }

    /// Create a client with a custom transport, e.g. tighter timeouts or a
    /// different retry policy.
    pub fn with_http_client(
        origin: impl Into<String>,
        http_client: HttpClient,
        token_provider: Arc<dyn IdTokenProvider>,
    ) -> Self {
        let origin = origin.into();
        let base_url = format!("{}/api/v1", origin.trim_end_matches('/'));

        Self { base_url, http_client, token_provider }
    }

    /// The resolved API root, `<origin>/api/v1`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self, query))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let token = self.token_provider.id_token().await?;
        let url = format!("{}{path}", self.base_url);

        let request_builder = self
            .http_client
            .request(Method::GET, &url)
            .query(&[("code", token.as_str())])
            .query(query);

        let response = self.http_client.send(request_builder).await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, body))]
    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let response = self.dispatch(method, path, body).await?;
        Self::decode(response).await
    }

    #[instrument(skip(self, body))]
    async fn post_unit(&self, path: &str, body: &impl Serialize) -> Result<()> {
        let response = self.dispatch(Method::POST, path, body).await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
    ) -> Result<Response> {
        let token = self.token_provider.id_token().await?;
        let url = format!("{}{path}", self.base_url);

        let request_builder = self
            .http_client
            .request(method, &url)
            .query(&[("code", token.as_str())])
            .json(body);

        self.http_client.send(request_builder).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::ensure_success(response).await?;
        response.json().await.map_err(ApiError::from)
    }

    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        debug!(status = status.as_u16(), "received registry response");

        if !status.is_success() {
            let body =
                response.text().await.unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ApiError::Status { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl FeatureCatalog for CatalogClient {
    async fn fetch_projects(&self) -> Result<Vec<String>> {
        self.get_json("/projects", &[]).await
    }

    async fn fetch_data_sources(&self, project: &str) -> Result<Vec<DataSource>> {
        self.get_json(&format!("/projects/{project}/datasources"), &[]).await
    }

    async fn fetch_features(
        &self,
        project: &str,
        page: u32,
        limit: u32,
        keyword: &str,
    ) -> Result<Vec<Feature>> {
        let page = page.to_string();
        let limit = limit.to_string();
        // The keyword is sent even when empty; the registry treats a missing
        // parameter as a different query.
        self.get_json(
            &format!("/projects/{project}/features"),
            &[("keyword", keyword), ("page", page.as_str()), ("limit", limit.as_str())],
        )
        .await
    }

    async fn fetch_feature(&self, id: &str) -> Result<Feature> {
        self.get_json(&format!("/features/{id}"), &[]).await
    }

    async fn fetch_project_lineages(&self, project: &str) -> Result<FeatureLineage> {
        self.get_json(&format!("/projects/{project}"), &[]).await
    }

    async fn fetch_feature_lineages(&self, feature: &str) -> Result<FeatureLineage> {
        self.get_json(&format!("/features/lineage/{feature}"), &[]).await
    }

    async fn create_feature(&self, feature: &Feature) -> Result<Uuid> {
        let created: GuidResponse = self.send_json(Method::POST, "/features", feature).await?;
        info!(guid = %created.guid, "registered feature");
        Ok(created.guid)
    }

    async fn update_feature(&self, feature: &Feature, id: Uuid) -> Result<Uuid> {
        // The registry keys the update on the path; the body's guid must
        // agree with it no matter what the caller handed in.
        let mut body = feature.clone();
        body.guid = id;

        let updated: GuidResponse =
            self.send_json(Method::PUT, &format!("/features/{id}"), &body).await?;
        Ok(updated.guid)
    }

    async fn list_user_roles(&self) -> Result<Vec<UserRole>> {
        serde_json::from_str(USER_ROLE_SAMPLE).map_err(|err| ApiError::Internal(format!(
            "bundled user role records are malformed: {err}"
        )))
    }

    async fn get_user_role(&self, user_name: &str) -> Result<UserRole> {
        self.get_json(&format!("/user/{user_name}/userroles"), &[]).await
    }

    async fn add_user_role(&self, role: &Role) -> Result<()> {
        info!(user = %role.user_name, role = %role.role_name, scope = %role.scope, "granting role");
        self.post_unit(&format!("/user/{}/userroles/new", role.user_name), role).await
    }

    async fn delete_user_role(&self, role: &Role) -> Result<()> {
        info!(user = %role.user_name, role = %role.role_name, scope = %role.scope, "revoking role");
        self.post_unit(&format!("/user/{}/userroles/delete", role.user_name), role).await
    }
}

/// Mutation responses carry the affected entity's guid and nothing else the
/// client needs.
#[derive(Debug, Deserialize)]
struct GuidResponse {
    guid: Uuid,
}
