//! Identity-token acquisition policy
//!
//! [`TokenProvider`] turns "the signed-in user" into a token string: it
//! resolves the target account, asks the identity client for a silent
//! acquisition, and falls back to the interactive flow only when the
//! authority classifies the failure as requiring interaction. Every other
//! failure surfaces to the caller.

use std::sync::Arc;

use tracing::debug;

use super::error::AuthError;
use super::traits::IdentityClient;
use super::types::TokenRequest;

/// Scopes requested when the caller does not override them.
pub const DEFAULT_SCOPES: &[&str] = &["User.Read"];

/// Acquisition policy over an injected identity client
///
/// Holds no token state of its own; caching and refresh live behind the
/// [`IdentityClient`] seam.
#[derive(Clone)]
pub struct TokenProvider {
    client: Arc<dyn IdentityClient>,
    scopes: Vec<String>,
}

impl TokenProvider {
    /// Create a provider requesting [`DEFAULT_SCOPES`].
    #[must_use]
    pub fn new(client: Arc<dyn IdentityClient>) -> Self {
        Self::with_scopes(client, DEFAULT_SCOPES.iter().map(ToString::to_string).collect())
    }

    /// Create a provider requesting the given scopes.
    #[must_use]
    pub fn with_scopes(client: Arc<dyn IdentityClient>, scopes: Vec<String>) -> Self {
        Self { client, scopes }
    }

    /// Acquire an identity token for the signed-in user.
    ///
    /// Target account is the active account, else the first known one. A
    /// silent acquisition is attempted first; the interactive flow runs only
    /// when the silent failure is classified as interaction-required.
    ///
    /// # Errors
    /// [`AuthError::NotAuthenticated`] when no account is known; otherwise
    /// whatever the identity client reported from the path that failed.
    pub async fn get_id_token(&self) -> Result<String, AuthError> {
        let account = self
            .client
            .active_account()
            .or_else(|| self.client.accounts().into_iter().next())
            .ok_or(AuthError::NotAuthenticated)?;

        debug!(account = %account.username, "acquiring identity token");
        let request = TokenRequest::for_account(self.scopes.clone(), account);

        let tokens = match self.client.acquire_token_silent(&request).await {
            Ok(tokens) => tokens,
            Err(err) if err.is_interaction_required() => {
                debug!(reason = %err, "silent acquisition needs interaction, starting interactive flow");
                self.client.acquire_token_interactive(&request).await?
            }
            Err(err) => return Err(err),
        };

        Ok(tokens.identity_token().to_string())
    }
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenProvider").field("scopes", &self.scopes).finish()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for auth::provider.
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::auth::types::{Account, TokenSet};

    /// What the mock answers from each acquisition path.
    #[derive(Clone, Copy)]
    enum Grant {
        IdToken(&'static str),
        AccessOnly(&'static str),
        InteractionRequired,
        AuthorityRejection,
    }

    struct MockIdentityClient {
        active: Option<Account>,
        accounts: Vec<Account>,
        silent: Grant,
        interactive: Grant,
        silent_calls: AtomicUsize,
        interactive_calls: AtomicUsize,
        last_request: Mutex<Option<TokenRequest>>,
    }

    impl MockIdentityClient {
        fn new(accounts: Vec<Account>, silent: Grant, interactive: Grant) -> Self {
            Self {
                active: None,
                accounts,
                silent,
                interactive,
                silent_calls: AtomicUsize::new(0),
                interactive_calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn grant(&self, grant: Grant) -> Result<TokenSet, AuthError> {
            match grant {
                Grant::IdToken(id) => Ok(TokenSet::new(
                    "access-jwt".to_string(),
                    None,
                    Some(id.to_string()),
                    3600,
                    None,
                )),
                Grant::AccessOnly(access) => {
                    Ok(TokenSet::new(access.to_string(), None, None, 3600, None))
                }
                Grant::InteractionRequired => {
                    Err(AuthError::InteractionRequired("no cached tokens".to_string()))
                }
                Grant::AuthorityRejection => {
                    Err(AuthError::Authority("invalid_client".to_string()))
                }
            }
        }
    }

    #[async_trait]
    impl IdentityClient for MockIdentityClient {
        fn active_account(&self) -> Option<Account> {
            self.active.clone()
        }

        fn accounts(&self) -> Vec<Account> {
            self.accounts.clone()
        }

        async fn acquire_token_silent(
            &self,
            request: &TokenRequest,
        ) -> Result<TokenSet, AuthError> {
            self.silent_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            self.grant(self.silent)
        }

        async fn acquire_token_interactive(
            &self,
            request: &TokenRequest,
        ) -> Result<TokenSet, AuthError> {
            self.interactive_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            self.grant(self.interactive)
        }
    }

    fn user(name: &str) -> Account {
        Account::new(format!("{name}-id"), format!("{name}@plumage.dev"))
    }

    #[tokio::test]
    async fn returns_token_from_silent_path() {
        let client = Arc::new(MockIdentityClient::new(
            vec![user("alice")],
            Grant::IdToken("silent-id-jwt"),
            Grant::IdToken("unreachable"),
        ));
        let provider = TokenProvider::new(client.clone());

        let token = provider.get_id_token().await.unwrap();

        assert_eq!(token, "silent-id-jwt");
        assert_eq!(client.silent_calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.interactive_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn falls_back_to_interactive_when_interaction_required() {
        let client = Arc::new(MockIdentityClient::new(
            vec![user("alice")],
            Grant::InteractionRequired,
            Grant::IdToken("interactive-id-jwt"),
        ));
        let provider = TokenProvider::new(client.clone());

        let token = provider.get_id_token().await.unwrap();

        assert_eq!(token, "interactive-id-jwt");
        assert_eq!(client.silent_calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.interactive_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn surfaces_non_interactive_silent_failures() {
        let client = Arc::new(MockIdentityClient::new(
            vec![user("alice")],
            Grant::AuthorityRejection,
            Grant::IdToken("unreachable"),
        ));
        let provider = TokenProvider::new(client.clone());

        let result = provider.get_id_token().await;

        assert!(matches!(result, Err(AuthError::Authority(_))));
        assert_eq!(client.interactive_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn errors_when_no_account_is_known() {
        let client = Arc::new(MockIdentityClient::new(
            Vec::new(),
            Grant::IdToken("unreachable"),
            Grant::IdToken("unreachable"),
        ));
        let provider = TokenProvider::new(client.clone());

        let result = provider.get_id_token().await;

        assert!(matches!(result, Err(AuthError::NotAuthenticated)));
        assert_eq!(client.silent_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn prefers_active_account_over_first_known() {
        let mut client = MockIdentityClient::new(
            vec![user("alice"), user("bob")],
            Grant::IdToken("id-jwt"),
            Grant::IdToken("unreachable"),
        );
        client.active = Some(user("bob"));
        let client = Arc::new(client);
        let provider = TokenProvider::new(client.clone());

        provider.get_id_token().await.unwrap();

        let request = client.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.account.unwrap().username, "bob@plumage.dev");
    }

    #[tokio::test]
    async fn targets_first_account_without_an_active_one() {
        let client = Arc::new(MockIdentityClient::new(
            vec![user("alice"), user("bob")],
            Grant::IdToken("id-jwt"),
            Grant::IdToken("unreachable"),
        ));
        let provider = TokenProvider::new(client.clone());

        provider.get_id_token().await.unwrap();

        let request = client.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.account.unwrap().username, "alice@plumage.dev");
        assert_eq!(request.scopes, vec!["User.Read".to_string()]);
    }

    #[tokio::test]
    async fn falls_back_to_access_token_without_id_token() {
        let client = Arc::new(MockIdentityClient::new(
            vec![user("alice")],
            Grant::AccessOnly("bare-access-jwt"),
            Grant::IdToken("unreachable"),
        ));
        let provider = TokenProvider::new(client);

        let token = provider.get_id_token().await.unwrap();

        assert_eq!(token, "bare-access-jwt");
    }

    #[tokio::test]
    async fn custom_scopes_are_forwarded() {
        let client = Arc::new(MockIdentityClient::new(
            vec![user("alice")],
            Grant::IdToken("id-jwt"),
            Grant::IdToken("unreachable"),
        ));
        let provider = TokenProvider::with_scopes(
            client.clone(),
            vec!["Catalog.Read".to_string(), "openid".to_string()],
        );

        provider.get_id_token().await.unwrap();

        let request = client.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.scope_string(), "Catalog.Read openid");
    }
}
