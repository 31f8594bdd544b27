//! Identity-token acquisition building blocks
//!
//! This module provides the pieces a Plumage client composes to turn "the
//! signed-in user" into a bearer token for the catalog API:
//!
//! - **[`types`]**: tokens, accounts, and acquisition requests
//! - **[`pkce`]**: RFC 7636 challenge generation for interactive flows
//! - **[`traits`]**: the [`IdentityClient`] abstraction over an identity
//!   platform (accounts, silent and interactive acquisition)
//! - **[`provider`]**: the [`TokenProvider`] policy: resolve an account,
//!   try silent acquisition, fall back to interactive only when the
//!   authority demands interaction
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐
//! │ TokenProvider │  Acquisition policy (silent → interactive)
//! └───────┬───────┘
//!         │
//!         └──► dyn IdentityClient   (accounts + token grants; implemented
//!                                    against a real authority elsewhere)
//! ```
//!
//! The provider never talks to the network itself; everything
//! authority-specific sits behind the trait so tests and alternative
//! platforms can substitute their own client.

pub mod error;
pub mod pkce;
pub mod provider;
pub mod traits;
pub mod types;

// Re-export commonly used types and functions
pub use error::AuthError;
pub use pkce::{code_challenge_for, PkceChallenge};
pub use provider::{TokenProvider, DEFAULT_SCOPES};
pub use traits::IdentityClient;
pub use types::{Account, AuthorityError, TokenRequest, TokenResponse, TokenSet};
