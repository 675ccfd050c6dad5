//! Configuration loader
//!
//! Loads the calendar integration configuration from environment variables
//! (a `.env` file is honored for local development). Missing client
//! credentials are a boot-time failure: the loader returns `Config` errors
//! and the embedding process is expected to abort startup rather than
//! degrade per-request.
//!
//! ## Environment Variables
//! - `GOOGLE_CALENDAR_CLIENT_ID`: OAuth client id (required)
//! - `GOOGLE_CALENDAR_CLIENT_SECRET`: OAuth client secret (optional; PKCE-only
//!   clients have none)
//! - `QUICKSLOT_REDIRECT_URI`: OAuth redirect URI
//! - `QUICKSLOT_CALENDAR_ID`: target calendar (defaults to `primary`)
//! - `QUICKSLOT_CALENDAR_ENABLED`: feature gate for the whole pipeline
//!   (defaults to true)

use quickslot_domain::{QuickslotError, Result};

const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000/oauth/callback";
const DEFAULT_CALENDAR_ID: &str = "primary";

/// OAuth client settings for the Google authorization server.
///
/// Constructed once at process start and injected into the OAuth client;
/// there is no process-wide singleton.
#[derive(Debug, Clone)]
pub struct GoogleAuthConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
}

/// Full integration configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub google: GoogleAuthConfig,
    /// Target calendar for event inserts and free/busy queries.
    pub calendar_id: String,
    /// Feature gate: when false the boundary answers `feature_disabled`
    /// without touching the pipeline.
    pub calendar_enabled: bool,
}

/// Load configuration from environment variables.
///
/// # Errors
/// Returns `QuickslotError::Config` if required variables are missing.
pub fn load() -> Result<AppConfig> {
    // Best effort: a missing .env file is fine outside development
    dotenvy::dotenv().ok();
    load_from_env()
}

/// Load configuration from already-set environment variables.
///
/// # Errors
/// Returns `QuickslotError::Config` if required variables are missing.
pub fn load_from_env() -> Result<AppConfig> {
    let client_id = env_var("GOOGLE_CALENDAR_CLIENT_ID")?;
    let client_secret = std::env::var("GOOGLE_CALENDAR_CLIENT_SECRET").ok();
    let redirect_uri = std::env::var("QUICKSLOT_REDIRECT_URI")
        .unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string());
    let calendar_id = std::env::var("QUICKSLOT_CALENDAR_ID")
        .unwrap_or_else(|_| DEFAULT_CALENDAR_ID.to_string());
    let calendar_enabled = env_bool("QUICKSLOT_CALENDAR_ENABLED", true);

    tracing::info!(calendar_enabled, "configuration loaded from environment");

    Ok(AppConfig {
        google: GoogleAuthConfig { client_id, client_secret, redirect_uri },
        calendar_id,
        calendar_enabled,
    })
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| QuickslotError::Config(format!("missing environment variable: {name}")))
}

fn env_bool(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    //! Unit tests for config::loader.
    //!
    //! Environment mutation is process-global, so these tests serialize
    //! through a lock.
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn clear_env() {
        for name in [
            "GOOGLE_CALENDAR_CLIENT_ID",
            "GOOGLE_CALENDAR_CLIENT_SECRET",
            "QUICKSLOT_REDIRECT_URI",
            "QUICKSLOT_CALENDAR_ID",
            "QUICKSLOT_CALENDAR_ENABLED",
        ] {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_missing_client_id_is_config_error() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();

        let result = load_from_env();
        assert!(matches!(result, Err(QuickslotError::Config(_))));
    }

    #[test]
    fn test_defaults_apply() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("GOOGLE_CALENDAR_CLIENT_ID", "client-123");

        let config = load_from_env().unwrap();
        assert_eq!(config.google.client_id, "client-123");
        assert!(config.google.client_secret.is_none());
        assert_eq!(config.calendar_id, "primary");
        assert!(config.calendar_enabled);

        clear_env();
    }

    #[test]
    fn test_feature_gate_parses_falsy_values() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_env();
        std::env::set_var("GOOGLE_CALENDAR_CLIENT_ID", "client-123");
        std::env::set_var("QUICKSLOT_CALENDAR_ENABLED", "false");

        let config = load_from_env().unwrap();
        assert!(!config.calendar_enabled);

        clear_env();
    }
}
