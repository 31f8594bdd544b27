//! Error type for identity-token acquisition

use thiserror::Error;

/// Error type for token acquisition operations
#[derive(Debug, Error)]
pub enum AuthError {
    /// Silent acquisition cannot proceed; the user must sign in or consent
    #[error("interaction required: {0}")]
    InteractionRequired(String),

    /// No account is signed in
    #[error("not authenticated: no account available")]
    NotAuthenticated,

    /// The authority rejected the request
    #[error("authority error: {0}")]
    Authority(String),

    /// Request to the authority failed at the transport level
    #[error("network error: {0}")]
    Network(String),

    /// Timed out waiting on the flow (redirect, authority response)
    #[error("timed out: {0}")]
    Timeout(String),

    /// State mismatch on the redirect (possible CSRF)
    #[error("state mismatch: expected {expected}, received {received}")]
    StateMismatch { expected: String, received: String },

    /// A response or token could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid identity configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl AuthError {
    /// Whether interactive acquisition is the prescribed next step.
    #[must_use]
    pub fn is_interaction_required(&self) -> bool {
        matches!(self, Self::InteractionRequired(_))
    }
}
