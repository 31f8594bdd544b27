//! # Plumage Registry Client
//!
//! HTTP access to the Plumage feature catalog.
//!
//! This crate contains:
//! - The typed catalog client (projects, data sources, features, lineage,
//!   role assignments)
//! - Identity-token plumbing for catalog calls (silent first, interactive
//!   fallback via the system browser)
//! - The loopback listener used during interactive sign-in
//! - Environment-driven configuration
//!
//! ## Architecture
//! - Implements the [`FeatureCatalog`] port over `<origin>/api/v1`
//! - Depends on `plumage-domain` for wire types and `plumage-common` for
//!   token policy
//! - Contains all "impure" code (network I/O, environment access)

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{CatalogClient, FeatureCatalog, IdTokenProvider};
pub use auth::{IdentitySettings, LoopbackServer, NativeIdentityClient};
pub use config::RegistrySettings;
pub use errors::{ApiError, ApiErrorCategory, Result};
pub use http::HttpClient;
