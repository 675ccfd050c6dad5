//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Quickslot
///
/// Parse and validation failures are always raised before any network call;
/// `Upstream` carries the provider's own error code so the boundary layer can
/// pass it through verbatim.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum QuickslotError {
    #[error("No temporal expression found: {0}")]
    Parse(String),

    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    #[error("Duration too long: {0}")]
    DurationTooLong(String),

    #[error("Not connected: {0}")]
    NotConnected(String),

    #[error("Authorization revoked: {0}")]
    AuthRevoked(String),

    #[error("Calendar provider error ({code}): {message}")]
    Upstream { code: String, message: String },

    #[error("Feature disabled: {0}")]
    FeatureDisabled(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Quickslot operations
pub type Result<T> = std::result::Result<T, QuickslotError>;
