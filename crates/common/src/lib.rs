//! # Plumage Common
//!
//! Foundation utilities shared across Plumage crates.
//!
//! This crate contains:
//! - OAuth 2.0 / OpenID Connect token types and expiry bookkeeping
//! - PKCE challenge generation (RFC 7636)
//! - The [`auth::IdentityClient`] seam and the [`auth::TokenProvider`]
//!   acquisition policy built on top of it
//!
//! ## Architecture
//! - No dependency on HTTP transports; identity clients that speak to an
//!   authority live in consuming crates
//! - Only `plumage-domain`-free, side-effect-free building blocks

pub mod auth;
