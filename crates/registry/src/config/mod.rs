//! Configuration loading
//!
//! Resolves the registry origin and identity-platform settings from
//! environment variables (with `.env` support).

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, RegistrySettings, DEFAULT_API_ENDPOINT};
