//! Example: Browsing the feature catalog
//!
//! Signs in through the system browser on first use, then walks the
//! registry: project list, per-project features, and the caller's role.
//!
//! # Setup
//!
//! 1. Point at a registry (defaults to http://localhost:8000): ```bash export
//!    PLUMAGE_API_ENDPOINT=https://my-registry.example.com ```
//!
//! 2. Register a native client with your identity tenant and export: ```bash
//!    export PLUMAGE_TENANT_ID=common export PLUMAGE_CLIENT_ID=<app id> ```
//!
//! 3. Run this example: ```bash cargo run --example fetch_catalog ```

use std::sync::Arc;

use plumage_common::auth::TokenProvider;
use plumage_registry::{config, CatalogClient, FeatureCatalog, NativeIdentityClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("Plumage Catalog Walkthrough");
    println!("===========================\n");

    let settings = config::load()?;
    println!("Registry: {}\n", settings.api_endpoint);

    // First call triggers the browser sign-in; later calls reuse the session.
    let identity = NativeIdentityClient::new(settings.identity_settings()?);
    let provider = TokenProvider::with_scopes(Arc::new(identity), settings.scopes.clone());
    let client = CatalogClient::new(settings.api_endpoint.clone(), Arc::new(provider))?;

    let projects = client.fetch_projects().await?;
    println!("✓ {} project(s) registered", projects.len());

    for project in &projects {
        let features = client.fetch_features(project, 1, 10, "").await?;
        println!("\n  {project}: showing {} feature(s)", features.len());

        for feature in &features {
            println!("    - {}", feature.qualified_name());
        }

        let sources = client.fetch_data_sources(project).await?;
        for source in &sources {
            println!("    source: {} ({})", source.attributes.name, source.attributes.source_type);
        }
    }

    println!("\n✓ Done");
    Ok(())
}
