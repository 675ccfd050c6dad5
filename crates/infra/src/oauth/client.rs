//! OAuth 2.0 client for the Google authorization server.
//!
//! Handles the authorization-code flow with offline access:
//! - PKCE challenge generation
//! - Authorization URL building
//! - Authorization code exchange
//! - Refresh-token exchange
//!
//! The client is constructed from an explicit [`GoogleAuthConfig`] injected
//! at process start; there is no module-level state beyond the in-flight
//! PKCE challenge.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use quickslot_core::{RefreshedToken, TokenExchange};
use quickslot_domain::{Credential, QuickslotError, Result};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

use super::pkce::PkceChallenge;
use crate::config::GoogleAuthConfig;

const GOOGLE_AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Scopes requested for calendar access (event insert plus free/busy reads).
const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/calendar.events",
    "https://www.googleapis.com/auth/calendar.readonly",
];

const HTTP_TIMEOUT_SECONDS: u64 = 30;

/// OAuth 2.0 client with PKCE support, configured for Google.
pub struct OAuthClient {
    config: GoogleAuthConfig,
    client: reqwest::Client,
    token_endpoint: String,
    current_challenge: Arc<Mutex<Option<PkceChallenge>>>,
}

impl OAuthClient {
    /// Create a new OAuth client from injected configuration.
    ///
    /// # Errors
    /// Returns `Config` if the HTTP client cannot be built.
    pub fn new(config: GoogleAuthConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| QuickslotError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            token_endpoint: GOOGLE_TOKEN_ENDPOINT.to_string(),
            current_challenge: Arc::new(Mutex::new(None)),
        })
    }

    /// Point the client at a different token endpoint (for testing).
    #[cfg(test)]
    pub fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = endpoint.into();
        self
    }

    /// Generate the authorization URL for browser-based login.
    ///
    /// Requests offline access so a refresh token is issued. Returns the URL
    /// and the state value to validate in the callback.
    pub async fn generate_authorization_url(&self) -> (String, String) {
        let challenge = PkceChallenge::generate();
        let state = challenge.state.clone();

        let params = vec![
            ("response_type".to_string(), "code".to_string()),
            ("client_id".to_string(), self.config.client_id.clone()),
            ("redirect_uri".to_string(), self.config.redirect_uri.clone()),
            ("scope".to_string(), SCOPES.join(" ")),
            ("state".to_string(), state.clone()),
            ("code_challenge".to_string(), challenge.code_challenge.clone()),
            ("code_challenge_method".to_string(), challenge.challenge_method().to_string()),
            // Offline access: a refresh token is only issued with consent
            ("access_type".to_string(), "offline".to_string()),
            ("prompt".to_string(), "consent".to_string()),
        ];

        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        *self.current_challenge.lock().await = Some(challenge);

        (format!("{GOOGLE_AUTHORIZATION_ENDPOINT}?{query}"), state)
    }

    /// Exchange an authorization code for a credential.
    ///
    /// # Errors
    /// Returns `NotConnected` on state mismatch or when the provider rejects
    /// the exchange, `Network` on transport failure.
    pub async fn exchange_code_for_tokens(&self, code: &str, state: &str) -> Result<Credential> {
        let challenge = self.current_challenge.lock().await.take().ok_or_else(|| {
            QuickslotError::NotConnected("no authorization flow in progress".to_string())
        })?;

        if challenge.state != state {
            return Err(QuickslotError::NotConnected(
                "OAuth state mismatch in callback".to_string(),
            ));
        }

        let mut form = vec![
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("client_id".to_string(), self.config.client_id.clone()),
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), self.config.redirect_uri.clone()),
            ("code_verifier".to_string(), challenge.code_verifier),
        ];
        if let Some(secret) = &self.config.client_secret {
            form.push(("client_secret".to_string(), secret.clone()));
        }

        let response = self.token_request(&form).await?;
        debug!("authorization code exchanged");

        Ok(Credential {
            access_token: Some(response.access_token),
            refresh_token: response.refresh_token,
            expires_at: expires_at_from(response.expires_in),
        })
    }

    async fn token_request(&self, form: &[(String, String)]) -> Result<TokenEndpointResponse> {
        let response = self
            .client
            .post(&self.token_endpoint)
            .form(form)
            .send()
            .await
            .map_err(|e| QuickslotError::Network(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<OAuthErrorBody>().await {
                Ok(body) => body.to_string(),
                Err(_) => format!("HTTP {status}"),
            };
            return Err(QuickslotError::NotConnected(message));
        }

        response
            .json::<TokenEndpointResponse>()
            .await
            .map_err(|e| QuickslotError::NotConnected(format!("malformed token response: {e}")))
    }
}

#[async_trait]
impl TokenExchange for OAuthClient {
    async fn refresh_access_token(&self, refresh_token: &str) -> Result<RefreshedToken> {
        if refresh_token.is_empty() {
            return Err(QuickslotError::NotConnected("no refresh token available".to_string()));
        }

        let mut form = vec![
            ("grant_type".to_string(), "refresh_token".to_string()),
            ("client_id".to_string(), self.config.client_id.clone()),
            ("refresh_token".to_string(), refresh_token.to_string()),
        ];
        if let Some(secret) = &self.config.client_secret {
            form.push(("client_secret".to_string(), secret.clone()));
        }

        let response = self.token_request(&form).await?;

        Ok(RefreshedToken {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: expires_at_from(response.expires_in),
        })
    }
}

fn expires_at_from(expires_in: Option<i64>) -> Option<chrono::DateTime<Utc>> {
    expires_in.filter(|s| *s > 0).map(|s| Utc::now() + Duration::seconds(s))
}

/// Standard OAuth 2.0 token response (RFC 6749).
#[derive(Debug, Deserialize)]
struct TokenEndpointResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
}

/// Standard OAuth 2.0 error response (RFC 6749 §5.2).
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    error_description: Option<String>,
}

impl std::fmt::Display for OAuthErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.error_description {
            Some(description) => write!(f, "{}: {}", self.error, description),
            None => write!(f, "{}", self.error),
        }
    }
}
