//! Configuration loader
//!
//! Loads client configuration from environment variables.
//!
//! ## Loading Strategy
//! 1. `.env` files are merged into the process environment (via `dotenvy`)
//! 2. Variables that are unset, empty, or whitespace-only fall back to
//!    defaults
//!
//! ## Environment Variables
//! - `PLUMAGE_API_ENDPOINT`: Registry origin, e.g. `https://catalog.example.com`
//! - `PLUMAGE_TENANT_ID`: Identity-platform tenant for sign-in
//! - `PLUMAGE_CLIENT_ID`: Application (client) id registered with the tenant
//! - `PLUMAGE_SCOPES`: Space-separated token scopes

use url::Url;

use crate::auth::IdentitySettings;
use crate::errors::{ApiError, Result};

/// Origin used when `PLUMAGE_API_ENDPOINT` is unset or empty.
pub const DEFAULT_API_ENDPOINT: &str = "http://localhost:8000";

/// Resolved client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySettings {
    /// Registry origin; the client appends `/api/v1`.
    pub api_endpoint: String,
    /// Identity-platform tenant, when sign-in is configured.
    pub tenant_id: Option<String>,
    /// Application (client) id, when sign-in is configured.
    pub client_id: Option<String>,
    /// Token scopes to request.
    pub scopes: Vec<String>,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            tenant_id: None,
            client_id: None,
            scopes: plumage_common::auth::DEFAULT_SCOPES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl RegistrySettings {
    /// Build identity settings from the configured tenant and client id.
    ///
    /// # Errors
    /// Returns `ApiError::Config` naming the missing variable when either is
    /// absent.
    pub fn identity_settings(&self) -> Result<IdentitySettings> {
        let tenant_id = self.tenant_id.as_deref().ok_or_else(|| {
            ApiError::Config("missing required environment variable: PLUMAGE_TENANT_ID".to_string())
        })?;
        let client_id = self.client_id.as_deref().ok_or_else(|| {
            ApiError::Config("missing required environment variable: PLUMAGE_CLIENT_ID".to_string())
        })?;

        let mut settings = IdentitySettings::microsoft(tenant_id, client_id);
        settings.scopes = self.scopes.clone();
        Ok(settings)
    }
}

/// Load configuration, merging `.env` files into the environment first.
///
/// # Errors
/// Returns `ApiError::Config` when a configured endpoint is not a valid URL.
pub fn load() -> Result<RegistrySettings> {
    // Missing .env files are fine; only the process environment is required.
    dotenvy::dotenv().ok();
    load_from_env()
}

/// Load configuration from the process environment.
///
/// Unset, empty, and whitespace-only variables count as absent.
///
/// # Errors
/// Returns `ApiError::Config` when the configured endpoint is not a valid
/// URL.
pub fn load_from_env() -> Result<RegistrySettings> {
    let api_endpoint = match env_non_empty("PLUMAGE_API_ENDPOINT") {
        Some(endpoint) => normalize_endpoint(&endpoint)?,
        None => {
            tracing::debug!(fallback = DEFAULT_API_ENDPOINT, "PLUMAGE_API_ENDPOINT not set");
            DEFAULT_API_ENDPOINT.to_string()
        }
    };

    let scopes = match env_non_empty("PLUMAGE_SCOPES") {
        Some(raw) => raw.split_whitespace().map(ToString::to_string).collect(),
        None => plumage_common::auth::DEFAULT_SCOPES.iter().map(ToString::to_string).collect(),
    };

    Ok(RegistrySettings {
        api_endpoint,
        tenant_id: env_non_empty("PLUMAGE_TENANT_ID"),
        client_id: env_non_empty("PLUMAGE_CLIENT_ID"),
        scopes,
    })
}

/// Validate the endpoint and strip any trailing slash so `/api/v1` can be
/// appended without doubling separators.
fn normalize_endpoint(endpoint: &str) -> Result<String> {
    Url::parse(endpoint).map_err(|err| {
        ApiError::Config(format!("invalid PLUMAGE_API_ENDPOINT {endpoint:?}: {err}"))
    })?;
    Ok(endpoint.trim_end_matches('/').to_string())
}

/// Read an environment variable, treating empty and whitespace-only values
/// as unset.
fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}
