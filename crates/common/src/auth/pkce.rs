//! PKCE (Proof Key for Code Exchange) for OAuth 2.0
//!
//! Implements RFC 7636 for authorization without client secrets, as required
//! for native applications that cannot safely hold one.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Compute the code challenge for a verifier.
///
/// Per RFC 7636, the challenge is `BASE64URL(SHA256(ASCII(code_verifier)))`.
#[must_use]
pub fn code_challenge_for(verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

fn random_urlsafe_token() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

/// PKCE challenge triple for one authorization attempt
///
/// The verifier stays secret until token exchange; the challenge goes in the
/// authorization request; the state ties the redirect back to this attempt.
#[derive(Debug, Clone)]
pub struct PkceChallenge {
    /// Random string (32 bytes → 43 chars base64url, within the RFC 7636
    /// 43–128 limit)
    pub code_verifier: String,

    /// SHA256 hash of `code_verifier` (base64url)
    pub code_challenge: String,

    /// Random CSRF protection token for the redirect
    pub state: String,
}

impl PkceChallenge {
    /// Generate a fresh challenge with cryptographically random values.
    #[must_use]
    pub fn generate() -> Self {
        let code_verifier = random_urlsafe_token();
        let code_challenge = code_challenge_for(&code_verifier);
        let state = random_urlsafe_token();

        Self { code_verifier, code_challenge, state }
    }

    /// The challenge method (always "S256").
    #[must_use]
    pub fn challenge_method(&self) -> &'static str {
        "S256"
    }
}
