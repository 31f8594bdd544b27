//! Traits for identity-platform operations
//!
//! These traits enable dependency injection and testing by abstracting the
//! identity platform (account bookkeeping, token grants).

use async_trait::async_trait;

use super::error::AuthError;
use super::types::{Account, TokenRequest, TokenSet};

/// Trait for identity clients
///
/// An identity client tracks the signed-in accounts and performs the actual
/// token grants against an authority. Abstracting it keeps the acquisition
/// policy free of authority specifics and lets tests substitute mock
/// implementations.
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// The account marked active, if any
    fn active_account(&self) -> Option<Account>;

    /// All signed-in accounts, most recently added last
    fn accounts(&self) -> Vec<Account>;

    /// Acquire tokens without user interaction
    ///
    /// Serves cached tokens while they are fresh and refreshes them when
    /// possible. The request must name an account.
    ///
    /// # Errors
    /// Returns [`AuthError::InteractionRequired`] when nothing cached or
    /// refreshable can satisfy the request; other variants for authority,
    /// transport, or configuration failures.
    async fn acquire_token_silent(&self, request: &TokenRequest) -> Result<TokenSet, AuthError>;

    /// Acquire tokens with user interaction (browser sign-in)
    ///
    /// # Errors
    /// Returns error if the flow is abandoned, times out, or the authority
    /// rejects the exchange.
    async fn acquire_token_interactive(&self, request: &TokenRequest)
        -> Result<TokenSet, AuthError>;
}
