//! HTTP transport
//!
//! Thin retry/timeout layer over `reqwest` backing the catalog client.
//! Token-endpoint traffic does not retry and goes through a plain `reqwest`
//! client instead.

pub mod client;

// Re-export commonly used items
pub use client::{HttpClient, HttpClientBuilder};
