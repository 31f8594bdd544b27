//! Identity token types and structures
//!
//! Defines the data structures shared by silent and interactive token
//! acquisition: token sets with expiry bookkeeping, authority responses,
//! accounts, and acquisition requests.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// OAuth 2.0 / OpenID Connect tokens with metadata
///
/// - Optional refresh token (not every grant issues one)
/// - Both `expires_in` (duration) and `expires_at` (timestamp)
/// - Optional ID token carrying the user's identity claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// Access token for resource requests
    pub access_token: String,

    /// Refresh token for obtaining new access tokens without interaction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// ID token (JWT) containing user claims (OpenID Connect)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,

    /// Token type (always "Bearer" for OAuth 2.0)
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Absolute expiration timestamp (UTC), calculated from `expires_in`
    /// when the set is created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,

    /// Granted scopes (space-separated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenSet {
    /// Create a new `TokenSet` with a calculated expiration timestamp.
    #[must_use]
    pub fn new(
        access_token: String,
        refresh_token: Option<String>,
        id_token: Option<String>,
        expires_in: i64,
        scope: Option<String>,
    ) -> Self {
        let expires_at = if expires_in > 0 {
            Some(Utc::now() + chrono::Duration::seconds(expires_in))
        } else {
            None
        };

        Self {
            access_token,
            refresh_token,
            id_token,
            token_type: "Bearer".to_string(),
            expires_in,
            expires_at,
            scope,
        }
    }

    /// Check whether the set is expired or will expire within the threshold.
    ///
    /// Returns `false` when no expiry is known.
    #[must_use]
    pub fn is_expired(&self, threshold_seconds: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let threshold = chrono::Duration::seconds(threshold_seconds);
                Utc::now() + threshold >= expires_at
            }
            None => false,
        }
    }

    /// Seconds until expiry, or `None` when no expiry is known.
    #[must_use]
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        self.expires_at.map(|expires_at| (expires_at - Utc::now()).num_seconds())
    }

    /// The token that identifies the user: the ID token when the authority
    /// issued one, otherwise the access token.
    #[must_use]
    pub fn identity_token(&self) -> &str {
        self.id_token.as_deref().unwrap_or(&self.access_token)
    }
}

/// Token response from an authority's token endpoint
///
/// Standard OAuth 2.0 token response format (RFC 6749).
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub token_type: String,
    pub expires_in: i64,
    pub scope: Option<String>,
}

impl From<TokenResponse> for TokenSet {
    fn from(response: TokenResponse) -> Self {
        Self::new(
            response.access_token,
            response.refresh_token,
            response.id_token,
            response.expires_in,
            response.scope,
        )
    }
}

/// A signed-in account known to an identity client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable identifier assigned by the authority (subject / object id)
    pub id: String,
    /// Human-readable login (UPN or email)
    pub username: String,
}

impl Account {
    #[must_use]
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self { id: id.into(), username: username.into() }
    }
}

/// A token acquisition request: which scopes, for which account.
///
/// `account` is `None` for interactive sign-in of a new user; silent
/// acquisition always names an account.
#[derive(Debug, Clone)]
pub struct TokenRequest {
    pub scopes: Vec<String>,
    pub account: Option<Account>,
}

impl TokenRequest {
    #[must_use]
    pub fn new(scopes: Vec<String>) -> Self {
        Self { scopes, account: None }
    }

    #[must_use]
    pub fn for_account(scopes: Vec<String>, account: Account) -> Self {
        Self { scopes, account: Some(account) }
    }

    /// Scopes as the space-separated string the authority expects.
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}

/// Error response from an authority (RFC 6749 §5.2)
#[derive(Debug, Deserialize)]
pub struct AuthorityError {
    pub error: String,
    pub error_description: Option<String>,
}

impl AuthorityError {
    /// Whether this error means silent acquisition cannot succeed and the
    /// user must interact (sign in again, grant consent).
    #[must_use]
    pub fn requires_interaction(&self) -> bool {
        matches!(
            self.error.as_str(),
            "interaction_required" | "login_required" | "consent_required" | "invalid_grant"
        )
    }
}

impl fmt::Display for AuthorityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for AuthorityError {}
