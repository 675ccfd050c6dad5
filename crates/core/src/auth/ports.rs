//! Authorization provider port.
//!
//! Abstracts the OAuth token endpoint so the lifecycle can be exercised with
//! mock implementations in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quickslot_domain::Result;

/// Tokens returned by a successful refresh exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshedToken {
    pub access_token: String,
    /// Some providers rotate the refresh token; absent means keep the old one.
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Trait for refresh-token exchange against the authorization provider.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    /// Returns an error if the exchange fails (revoked token, network error,
    /// malformed response). Callers treat any failure as "not connected".
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<RefreshedToken>;
}
