//! Catalog API surface
//!
//! The twelve registry operations behind the [`FeatureCatalog`] trait, served
//! by [`CatalogClient`] over HTTP. Token acquisition is injected through the
//! [`IdTokenProvider`] seam so the transport never knows how sign-in works.

pub mod auth;
pub mod catalog;
pub mod client;

// Re-export commonly used items
pub use auth::IdTokenProvider;
pub use catalog::FeatureCatalog;
pub use client::CatalogClient;
