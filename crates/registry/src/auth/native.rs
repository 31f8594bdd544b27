//! Native identity client
//!
//! In-memory implementation of the `IdentityClient` seam against an
//! OAuth2/OIDC authority. Silent acquisition serves cached tokens while they
//! are fresh and redeems the refresh token when they are not; interactive
//! acquisition runs the authorization-code + PKCE flow through the system
//! browser and the loopback listener.
//!
//! Nothing is persisted: accounts and tokens live for the lifetime of the
//! client.

use std::collections::HashMap;
use std::process::Command;
use std::sync::{Arc, RwLock as StdRwLock};
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use plumage_common::auth::{
    Account, AuthError, AuthorityError, IdentityClient, PkceChallenge, TokenRequest,
    TokenResponse, TokenSet, DEFAULT_SCOPES,
};
use reqwest::Client;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::loopback::LoopbackServer;

/// Expiry margin under which cached tokens are refreshed instead of served.
const DEFAULT_REFRESH_THRESHOLD_SECONDS: i64 = 300;

/// How long interactive sign-in waits for the browser round-trip.
const DEFAULT_SIGN_IN_TIMEOUT: Duration = Duration::from_secs(300);

/// OpenID Connect scopes added to every grant so the authority issues an id
/// token and a refresh token alongside the access token.
const OIDC_SCOPES: &[&str] = &["openid", "profile", "offline_access"];

/// Authority endpoints and client registration for sign-in.
#[derive(Debug, Clone)]
pub struct IdentitySettings {
    /// Application (client) id registered with the authority.
    pub client_id: String,
    /// Authorization endpoint the browser is sent to.
    pub authorization_endpoint: String,
    /// Token endpoint codes and refresh tokens are redeemed at.
    pub token_endpoint: String,
    /// Scopes requested when the token request does not name any.
    pub scopes: Vec<String>,
    /// Expiry margin for serving cached tokens.
    pub refresh_threshold_seconds: i64,
    /// Deadline for the interactive browser round-trip.
    pub sign_in_timeout: Duration,
}

impl IdentitySettings {
    /// Settings for a Microsoft identity platform tenant.
    #[must_use]
    pub fn microsoft(tenant: impl AsRef<str>, client_id: impl Into<String>) -> Self {
        let tenant = tenant.as_ref();
        Self {
            client_id: client_id.into(),
            authorization_endpoint: format!(
                "https://login.microsoftonline.com/{tenant}/oauth2/v2.0/authorize"
            ),
            token_endpoint: format!(
                "https://login.microsoftonline.com/{tenant}/oauth2/v2.0/token"
            ),
            scopes: DEFAULT_SCOPES.iter().map(ToString::to_string).collect(),
            refresh_threshold_seconds: DEFAULT_REFRESH_THRESHOLD_SECONDS,
            sign_in_timeout: DEFAULT_SIGN_IN_TIMEOUT,
        }
    }
}

/// Opens the sign-in page in the user's browser.
pub trait BrowserLauncher: Send + Sync {
    /// Open `url` in a browser.
    ///
    /// # Errors
    /// Returns an error when no handler could be spawned.
    fn open(&self, url: &str) -> Result<(), AuthError>;
}

/// Launches the platform's default URL handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl BrowserLauncher for SystemBrowser {
    fn open(&self, url: &str) -> Result<(), AuthError> {
        let spawned = if cfg!(target_os = "macos") {
            Command::new("open").arg(url).spawn()
        } else if cfg!(target_os = "windows") {
            Command::new("cmd").args(["/C", "start", "", url]).spawn()
        } else {
            Command::new("xdg-open").arg(url).spawn()
        };

        spawned
            .map(drop)
            .map_err(|err| AuthError::Config(format!("failed to open browser: {err}")))
    }
}

/// Identity client backed by an OAuth2/OIDC authority.
pub struct NativeIdentityClient {
    settings: IdentitySettings,
    http: Client,
    browser: Arc<dyn BrowserLauncher>,
    accounts: StdRwLock<Vec<Account>>,
    active: StdRwLock<Option<String>>,
    tokens: RwLock<HashMap<String, TokenSet>>,
}

impl NativeIdentityClient {
    /// Create a client that opens sign-in pages in the system browser.
    #[must_use]
    pub fn new(settings: IdentitySettings) -> Self {
        Self::with_browser(settings, Arc::new(SystemBrowser))
    }

    /// Create a client with a custom browser launcher.
    #[must_use]
    pub fn with_browser(settings: IdentitySettings, browser: Arc<dyn BrowserLauncher>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            settings,
            http,
            browser,
            accounts: StdRwLock::new(Vec::new()),
            active: StdRwLock::new(None),
            tokens: RwLock::new(HashMap::new()),
        }
    }

    /// Seed an account and its tokens, e.g. when hydrating a session obtained
    /// elsewhere. The first known account becomes active.
    pub async fn install_account(&self, account: Account, tokens: TokenSet) {
        self.remember_account(&account);
        self.tokens.write().await.insert(account.id.clone(), tokens);
    }

    /// Make `account_id` the account silent acquisition targets by default.
    ///
    /// # Errors
    /// `AuthError::NotAuthenticated` when the account is unknown.
    pub fn set_active_account(&self, account_id: &str) -> Result<(), AuthError> {
        let known = {
            let accounts = self.accounts.read().expect("accounts lock poisoned");
            accounts.iter().any(|account| account.id == account_id)
        };
        if !known {
            return Err(AuthError::NotAuthenticated);
        }

        let mut active = self.active.write().expect("active lock poisoned");
        *active = Some(account_id.to_string());
        Ok(())
    }

    /// Forget an account and its cached tokens.
    pub async fn sign_out(&self, account_id: &str) {
        self.tokens.write().await.remove(account_id);

        let mut accounts = self.accounts.write().expect("accounts lock poisoned");
        accounts.retain(|account| account.id != account_id);
        drop(accounts);

        let mut active = self.active.write().expect("active lock poisoned");
        if active.as_deref() == Some(account_id) {
            *active = None;
        }
    }

    fn remember_account(&self, account: &Account) {
        let mut accounts = self.accounts.write().expect("accounts lock poisoned");
        if !accounts.iter().any(|known| known.id == account.id) {
            accounts.push(account.clone());
        }
        drop(accounts);

        let mut active = self.active.write().expect("active lock poisoned");
        if active.is_none() {
            *active = Some(account.id.clone());
        }
    }

    /// Scopes for a grant: the request's scopes (or the configured defaults)
    /// plus the OIDC set.
    fn grant_scope_string(&self, request: &TokenRequest) -> String {
        let base = if request.scopes.is_empty() { &self.settings.scopes } else { &request.scopes };
        let mut scopes = base.clone();
        for oidc in OIDC_SCOPES {
            if !scopes.iter().any(|scope| scope == oidc) {
                scopes.push((*oidc).to_string());
            }
        }
        scopes.join(" ")
    }

    fn build_authorize_url(
        &self,
        request: &TokenRequest,
        redirect_uri: &str,
        challenge: &PkceChallenge,
    ) -> String {
        let mut params = vec![
            ("response_type".to_string(), "code".to_string()),
            ("client_id".to_string(), self.settings.client_id.clone()),
            ("redirect_uri".to_string(), redirect_uri.to_string()),
            ("response_mode".to_string(), "query".to_string()),
            ("scope".to_string(), self.grant_scope_string(request)),
            ("state".to_string(), challenge.state.clone()),
            ("code_challenge".to_string(), challenge.code_challenge.clone()),
            ("code_challenge_method".to_string(), challenge.challenge_method().to_string()),
        ];

        if let Some(account) = &request.account {
            params.push(("login_hint".to_string(), account.username.clone()));
        }

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.settings.authorization_endpoint, query_string)
    }

    async fn redeem_authorization_code(
        &self,
        request: &TokenRequest,
        code: &str,
        redirect_uri: &str,
        code_verifier: &str,
    ) -> Result<TokenSet, AuthError> {
        let params = vec![
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("client_id".to_string(), self.settings.client_id.clone()),
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), redirect_uri.to_string()),
            ("code_verifier".to_string(), code_verifier.to_string()),
            ("scope".to_string(), self.grant_scope_string(request)),
        ];

        self.post_token_request(&params).await
    }

    async fn redeem_refresh_token(
        &self,
        request: &TokenRequest,
        refresh_token: &str,
    ) -> Result<TokenSet, AuthError> {
        let params = vec![
            ("grant_type".to_string(), "refresh_token".to_string()),
            ("client_id".to_string(), self.settings.client_id.clone()),
            ("refresh_token".to_string(), refresh_token.to_string()),
            ("scope".to_string(), self.grant_scope_string(request)),
        ];

        self.post_token_request(&params).await
    }

    async fn post_token_request(&self, params: &[(String, String)]) -> Result<TokenSet, AuthError> {
        let response = self
            .http
            .post(&self.settings.token_endpoint)
            .form(params)
            .send()
            .await
            .map_err(into_auth_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(match serde_json::from_str::<AuthorityError>(&body) {
                Ok(authority) if authority.requires_interaction() => {
                    AuthError::InteractionRequired(authority.to_string())
                }
                Ok(authority) => AuthError::Authority(authority.to_string()),
                Err(_) => {
                    AuthError::Authority(format!("token endpoint answered HTTP {status}: {body}"))
                }
            });
        }

        let tokens: TokenResponse =
            response.json().await.map_err(|err| AuthError::Parse(err.to_string()))?;
        Ok(tokens.into())
    }
}

#[async_trait]
impl IdentityClient for NativeIdentityClient {
    fn active_account(&self) -> Option<Account> {
        let active = self.active.read().expect("active lock poisoned").clone()?;
        let accounts = self.accounts.read().expect("accounts lock poisoned");
        accounts.iter().find(|account| account.id == active).cloned()
    }

    fn accounts(&self) -> Vec<Account> {
        self.accounts.read().expect("accounts lock poisoned").clone()
    }

    async fn acquire_token_silent(&self, request: &TokenRequest) -> Result<TokenSet, AuthError> {
        let account = request
            .account
            .clone()
            .or_else(|| self.active_account())
            .ok_or(AuthError::NotAuthenticated)?;

        let cached = self.tokens.read().await.get(&account.id).cloned();
        let Some(tokens) = cached else {
            return Err(AuthError::InteractionRequired(format!(
                "no cached tokens for {}",
                account.username
            )));
        };

        if !tokens.is_expired(self.settings.refresh_threshold_seconds) {
            debug!(account = %account.username, "serving cached tokens");
            return Ok(tokens);
        }

        let Some(refresh_token) = tokens.refresh_token.clone() else {
            return Err(AuthError::InteractionRequired(format!(
                "tokens for {} expired without a refresh token",
                account.username
            )));
        };

        debug!(account = %account.username, "refreshing expired tokens");
        let mut refreshed = self.redeem_refresh_token(request, &refresh_token).await?;
        // Authorities may omit the refresh token on refresh; keep the old one.
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = Some(refresh_token);
        }

        self.tokens.write().await.insert(account.id.clone(), refreshed.clone());
        Ok(refreshed)
    }

    async fn acquire_token_interactive(
        &self,
        request: &TokenRequest,
    ) -> Result<TokenSet, AuthError> {
        let server = LoopbackServer::start().await?;
        let redirect_uri = server.redirect_uri();
        let challenge = PkceChallenge::generate();

        let authorize_url = self.build_authorize_url(request, &redirect_uri, &challenge);
        server.set_expected_state(challenge.state.clone());

        info!("opening browser for interactive sign-in");
        self.browser.open(&authorize_url)?;

        let code = server.wait_for_code(self.settings.sign_in_timeout).await?;
        let tokens = self
            .redeem_authorization_code(request, &code, &redirect_uri, &challenge.code_verifier)
            .await?;

        let account = account_from_claims(&tokens)?;
        info!(account = %account.username, "interactive sign-in complete");
        self.remember_account(&account);
        self.tokens.write().await.insert(account.id.clone(), tokens.clone());

        server.shutdown().await?;
        Ok(tokens)
    }
}

fn into_auth_error(err: reqwest::Error) -> AuthError {
    if err.is_timeout() {
        AuthError::Timeout(err.to_string())
    } else {
        AuthError::Network(err.to_string())
    }
}

/// Identify the signed-in user from the id token's claims.
fn account_from_claims(tokens: &TokenSet) -> Result<Account, AuthError> {
    let id_token = tokens.id_token.as_deref().ok_or_else(|| {
        AuthError::Parse("authority issued no id token; cannot identify the account".to_string())
    })?;

    let claims = decode_jwt_claims(id_token)?;

    let id = claims
        .get("oid")
        .or_else(|| claims.get("sub"))
        .and_then(Value::as_str)
        .ok_or_else(|| AuthError::Parse("id token missing oid/sub claim".to_string()))?;

    let username = claims
        .get("preferred_username")
        .or_else(|| claims.get("email"))
        .or_else(|| claims.get("upn"))
        .and_then(Value::as_str)
        .ok_or_else(|| AuthError::Parse("id token missing username claim".to_string()))?;

    Ok(Account::new(id, username))
}

fn decode_jwt_claims(token: &str) -> Result<Value, AuthError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::Parse("invalid id token format".to_string()));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|err| AuthError::Parse(format!("failed to decode id token payload: {err}")))?;

    serde_json::from_slice(&payload)
        .map_err(|err| AuthError::Parse(format!("failed to parse id token payload: {err}")))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn fresh_tokens(access: &str) -> TokenSet {
        TokenSet::new(access.to_string(), Some("refresh-1".to_string()), None, 3600, None)
    }

    /// Expired with respect to the 300 s threshold.
    fn stale_tokens(access: &str, refresh: Option<&str>) -> TokenSet {
        TokenSet::new(access.to_string(), refresh.map(ToString::to_string), None, 1, None)
    }

    fn settings_for(server: &MockServer) -> IdentitySettings {
        let mut settings = IdentitySettings::microsoft("common", "test-client-id");
        settings.token_endpoint = format!("{}/token", server.uri());
        settings.sign_in_timeout = Duration::from_secs(5);
        settings
    }

    fn make_id_token(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{header}.{payload}.signature")
    }

    fn user(name: &str) -> Account {
        Account::new(format!("{name}-id"), format!("{name}@plumage.dev"))
    }

    /// Captures the authorize URL instead of spawning a browser.
    #[derive(Default)]
    struct CapturingBrowser {
        url: Mutex<Option<String>>,
    }

    impl BrowserLauncher for CapturingBrowser {
        fn open(&self, url: &str) -> Result<(), AuthError> {
            *self.url.lock().unwrap() = Some(url.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn silent_serves_cached_tokens_while_fresh() {
        let client = NativeIdentityClient::new(IdentitySettings::microsoft("common", "client"));
        let account = user("alice");
        client.install_account(account.clone(), fresh_tokens("cached-access")).await;

        let request = TokenRequest::for_account(vec!["User.Read".to_string()], account);
        let tokens = client.acquire_token_silent(&request).await.expect("tokens");

        assert_eq!(tokens.access_token, "cached-access");
    }

    #[tokio::test]
    async fn silent_refreshes_stale_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=refresh-old"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "refreshed-access",
                "refresh_token": "refresh-new",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = NativeIdentityClient::new(settings_for(&server));
        let account = user("alice");
        client.install_account(account.clone(), stale_tokens("old", Some("refresh-old"))).await;

        let request = TokenRequest::for_account(vec!["User.Read".to_string()], account.clone());
        let tokens = client.acquire_token_silent(&request).await.expect("tokens");

        assert_eq!(tokens.access_token, "refreshed-access");
        assert_eq!(tokens.refresh_token.as_deref(), Some("refresh-new"));

        // Cache now holds the refreshed set.
        let again = client.acquire_token_silent(&request).await.expect("tokens");
        assert_eq!(again.access_token, "refreshed-access");
    }

    #[tokio::test]
    async fn refresh_keeps_old_refresh_token_when_omitted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "refreshed-access",
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .mount(&server)
            .await;

        let client = NativeIdentityClient::new(settings_for(&server));
        let account = user("alice");
        client.install_account(account.clone(), stale_tokens("old", Some("refresh-old"))).await;

        let request = TokenRequest::for_account(vec!["User.Read".to_string()], account);
        let tokens = client.acquire_token_silent(&request).await.expect("tokens");

        assert_eq!(tokens.refresh_token.as_deref(), Some("refresh-old"));
    }

    #[tokio::test]
    async fn silent_without_cached_tokens_requires_interaction() {
        let client = NativeIdentityClient::new(IdentitySettings::microsoft("common", "client"));
        let request = TokenRequest::for_account(vec!["User.Read".to_string()], user("alice"));

        let err = client.acquire_token_silent(&request).await.expect_err("no cache");
        assert!(err.is_interaction_required());
    }

    #[tokio::test]
    async fn stale_tokens_without_refresh_token_require_interaction() {
        let client = NativeIdentityClient::new(IdentitySettings::microsoft("common", "client"));
        let account = user("alice");
        client.install_account(account.clone(), stale_tokens("old", None)).await;

        let request = TokenRequest::for_account(vec!["User.Read".to_string()], account);
        let err = client.acquire_token_silent(&request).await.expect_err("no refresh token");
        assert!(err.is_interaction_required());
    }

    #[tokio::test]
    async fn invalid_grant_on_refresh_requires_interaction() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "refresh token revoked"
            })))
            .mount(&server)
            .await;

        let client = NativeIdentityClient::new(settings_for(&server));
        let account = user("alice");
        client.install_account(account.clone(), stale_tokens("old", Some("refresh-old"))).await;

        let request = TokenRequest::for_account(vec!["User.Read".to_string()], account);
        let err = client.acquire_token_silent(&request).await.expect_err("revoked");
        assert!(err.is_interaction_required());
        assert!(err.to_string().contains("refresh token revoked"));
    }

    #[tokio::test]
    async fn authority_rejections_surface_as_authority_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": "invalid_client",
                "error_description": "client secret required"
            })))
            .mount(&server)
            .await;

        let client = NativeIdentityClient::new(settings_for(&server));
        let account = user("alice");
        client.install_account(account.clone(), stale_tokens("old", Some("refresh-old"))).await;

        let request = TokenRequest::for_account(vec!["User.Read".to_string()], account);
        let err = client.acquire_token_silent(&request).await.expect_err("rejected");
        assert!(matches!(err, AuthError::Authority(_)));
        assert!(!err.is_interaction_required());
    }

    #[tokio::test]
    async fn interactive_flow_signs_in_and_remembers_account() {
        let server = MockServer::start().await;
        let id_token = make_id_token(&json!({
            "oid": "user-1",
            "preferred_username": "alice@plumage.dev"
        }));
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=auth-code-123"))
            .and(body_string_contains("code_verifier="))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "interactive-access",
                "refresh_token": "interactive-refresh",
                "id_token": id_token,
                "token_type": "Bearer",
                "expires_in": 3600
            })))
            .expect(1)
            .mount(&server)
            .await;

        let browser = Arc::new(CapturingBrowser::default());
        let client = NativeIdentityClient::with_browser(settings_for(&server), browser.clone());

        // Play the authority: wait for the browser launch, then redirect back
        // to the loopback with the expected state.
        let browser_for_authority = browser.clone();
        let authority = tokio::spawn(async move {
            let url = loop {
                if let Some(url) = browser_for_authority.url.lock().unwrap().clone() {
                    break url;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            };

            let parsed = Url::parse(&url).expect("authorize url");
            let mut state = None;
            let mut redirect_uri = None;
            for (key, value) in parsed.query_pairs() {
                match key.as_ref() {
                    "state" => state = Some(value.into_owned()),
                    "redirect_uri" => redirect_uri = Some(value.into_owned()),
                    _ => {}
                }
            }
            let callback = format!(
                "{}?code=auth-code-123&state={}",
                redirect_uri.expect("redirect_uri param"),
                state.expect("state param"),
            );
            reqwest::get(&callback).await.expect("callback").text().await.expect("body");
        });

        let request = TokenRequest::new(vec!["User.Read".to_string()]);
        let tokens = client.acquire_token_interactive(&request).await.expect("tokens");
        authority.await.expect("authority task");

        assert_eq!(tokens.access_token, "interactive-access");
        assert_eq!(tokens.id_token.as_deref(), Some(id_token.as_str()));

        let account = client.active_account().expect("active account");
        assert_eq!(account.id, "user-1");
        assert_eq!(account.username, "alice@plumage.dev");

        // The session is now silently renewable.
        let silent = TokenRequest::for_account(vec!["User.Read".to_string()], account);
        let cached = client.acquire_token_silent(&silent).await.expect("cached");
        assert_eq!(cached.access_token, "interactive-access");
    }

    #[tokio::test]
    async fn authorize_url_carries_pkce_and_oidc_scopes() {
        let browser = Arc::new(CapturingBrowser::default());
        let client = NativeIdentityClient::with_browser(
            IdentitySettings::microsoft("contoso.onmicrosoft.com", "test-client-id"),
            browser.clone(),
        );

        let request = TokenRequest::new(vec!["User.Read".to_string()]);
        let challenge = PkceChallenge::generate();
        let url = client.build_authorize_url(&request, "http://localhost:9999/callback", &challenge);

        assert!(url.starts_with(
            "https://login.microsoftonline.com/contoso.onmicrosoft.com/oauth2/v2.0/authorize?"
        ));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=test-client-id"));
        assert!(url.contains("code_challenge="));
        assert!(url.contains("code_challenge_method=S256"));
        assert!(url.contains(&format!("state={}", challenge.state)));
        assert!(url.contains("User.Read%20openid%20profile%20offline_access"));
    }

    #[tokio::test]
    async fn sign_out_forgets_account_and_tokens() {
        let client = NativeIdentityClient::new(IdentitySettings::microsoft("common", "client"));
        let account = user("alice");
        client.install_account(account.clone(), fresh_tokens("cached-access")).await;
        assert!(client.active_account().is_some());

        client.sign_out(&account.id).await;

        assert!(client.active_account().is_none());
        assert!(client.accounts().is_empty());

        let request = TokenRequest::for_account(vec!["User.Read".to_string()], account);
        let err = client.acquire_token_silent(&request).await.expect_err("signed out");
        assert!(err.is_interaction_required());
    }

    #[tokio::test]
    async fn active_account_switches_between_known_accounts() {
        let client = NativeIdentityClient::new(IdentitySettings::microsoft("common", "client"));
        client.install_account(user("alice"), fresh_tokens("a")).await;
        client.install_account(user("bob"), fresh_tokens("b")).await;

        // First installed account is active by default.
        assert_eq!(client.active_account().expect("active").username, "alice@plumage.dev");

        client.set_active_account("bob-id").expect("switch");
        assert_eq!(client.active_account().expect("active").username, "bob@plumage.dev");

        let err = client.set_active_account("nobody").expect_err("unknown account");
        assert!(matches!(err, AuthError::NotAuthenticated));
    }

    #[test]
    fn account_parsing_prefers_oid_and_preferred_username() {
        let id_token = make_id_token(&json!({
            "oid": "object-id",
            "sub": "subject-id",
            "preferred_username": "alice@plumage.dev",
            "email": "alias@plumage.dev"
        }));
        let tokens = TokenSet::new("access".into(), None, Some(id_token), 3600, None);

        let account = account_from_claims(&tokens).expect("account");
        assert_eq!(account.id, "object-id");
        assert_eq!(account.username, "alice@plumage.dev");
    }

    #[test]
    fn missing_id_token_is_a_parse_error() {
        let tokens = TokenSet::new("access".into(), None, None, 3600, None);
        let err = account_from_claims(&tokens).expect_err("no id token");
        assert!(matches!(err, AuthError::Parse(_)));
    }

    #[test]
    fn malformed_id_token_is_a_parse_error() {
        let tokens =
            TokenSet::new("access".into(), None, Some("not-a-jwt".to_string()), 3600, None);
        let err = account_from_claims(&tokens).expect_err("malformed");
        assert!(matches!(err, AuthError::Parse(_)));
    }
}
