//! Token seam between the catalog transport and sign-in

use async_trait::async_trait;
use plumage_common::auth::TokenProvider;

use crate::errors::Result;

/// Yields the identity token attached to every catalog request.
#[async_trait]
pub trait IdTokenProvider: Send + Sync {
    /// Retrieve an identity token to authorize catalog calls.
    async fn id_token(&self) -> Result<String>;
}

#[async_trait]
impl IdTokenProvider for TokenProvider {
    async fn id_token(&self) -> Result<String> {
        Ok(self.get_id_token().await?)
    }
}
