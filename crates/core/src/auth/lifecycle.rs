//! Token lifecycle: guarantee a credential usable "now".
//!
//! Stateless per request — the lifecycle is purely a function of the stored
//! credential and the network. Nothing is cached across requests, so two
//! concurrent requests over the same stored credential may both refresh;
//! both succeed against the provider and the last persistence write wins.

use std::sync::Arc;

use quickslot_domain::constants::TOKEN_REFRESH_SKEW_SECONDS;
use quickslot_domain::{Credential, QuickslotError, Result};
use tracing::{debug, warn};

use super::ports::TokenExchange;

/// A credential vetted for immediate use, plus whether it was refreshed and
/// should be handed back to the caller for re-persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshCredential {
    pub credential: Credential,
    pub refreshed: bool,
}

/// Ensures stored credentials are usable, refreshing them when close to
/// expiry.
pub struct TokenLifecycle {
    exchange: Arc<dyn TokenExchange>,
    refresh_skew_seconds: i64,
}

impl TokenLifecycle {
    /// Create a lifecycle with the default 2-minute refresh skew.
    pub fn new(exchange: Arc<dyn TokenExchange>) -> Self {
        Self { exchange, refresh_skew_seconds: TOKEN_REFRESH_SKEW_SECONDS }
    }

    /// Override the refresh skew (seconds before expiry at which a credential
    /// counts as stale).
    #[must_use]
    pub fn with_refresh_skew(mut self, seconds: i64) -> Self {
        self.refresh_skew_seconds = seconds;
        self
    }

    /// Return a credential guaranteed usable now.
    ///
    /// Stale credentials (expiry within the skew window, or unknown expiry
    /// while a refresh token exists) are refreshed through the authorization
    /// provider. A refresh failure is reported, not retried.
    ///
    /// # Errors
    /// Returns `NotConnected` when no usable credential exists: nothing
    /// stored, no refresh token for a stale access token, or a failed
    /// refresh exchange.
    pub async fn ensure_fresh(&self, stored: Credential) -> Result<FreshCredential> {
        if !stored.is_usable() {
            return Err(QuickslotError::NotConnected(
                "no calendar credential stored for this session".to_string(),
            ));
        }

        if !self.needs_refresh(&stored) {
            return Ok(FreshCredential { credential: stored, refreshed: false });
        }

        let Some(refresh_token) = stored.refresh_token.clone() else {
            return Err(QuickslotError::NotConnected(
                "access token expired and no refresh token is available".to_string(),
            ));
        };

        match self.exchange.refresh_access_token(&refresh_token).await {
            Ok(refreshed) => {
                debug!(rotated = refreshed.refresh_token.is_some(), "access token refreshed");
                Ok(FreshCredential {
                    credential: Credential {
                        access_token: Some(refreshed.access_token),
                        // Keep the old refresh token unless the provider rotated it
                        refresh_token: refreshed.refresh_token.or(Some(refresh_token)),
                        expires_at: refreshed.expires_at,
                    },
                    refreshed: true,
                })
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                Err(QuickslotError::NotConnected(format!("token refresh failed: {err}")))
            }
        }
    }

    /// A credential needs a refresh when the access token is missing, expires
    /// within the skew window, or has no recorded expiry while a refresh
    /// token is present (treated conservatively as needing a check).
    fn needs_refresh(&self, credential: &Credential) -> bool {
        if credential.access_token.is_none() {
            return true;
        }
        match credential.expires_at {
            Some(_) => credential.is_expiring_within(self.refresh_skew_seconds),
            None => credential.refresh_token.is_some(),
        }
    }
}
