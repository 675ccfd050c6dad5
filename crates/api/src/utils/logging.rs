//! Logging helpers for the boundary layer.

use std::time::Duration;

use quickslot_domain::QuickslotError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber for the embedding process.
///
/// Honors `RUST_LOG`, defaulting to `info`. Safe to call more than once;
/// later calls are no-ops. Token values are never logged by this crate.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Log the outcome of a command execution with structured fields.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(command, duration_ms, "command_execution_success");
    } else {
        warn!(command, duration_ms, "command_execution_failure");
    }
}

/// Convert a `QuickslotError` into a stable label suitable for
/// metrics/logging.
#[inline]
#[must_use]
pub fn error_label(error: &QuickslotError) -> &'static str {
    match error {
        QuickslotError::Parse(_) => "parse",
        QuickslotError::InvalidTimeRange(_) => "invalid_time_range",
        QuickslotError::DurationTooLong(_) => "duration_too_long",
        QuickslotError::NotConnected(_) => "not_connected",
        QuickslotError::AuthRevoked(_) => "auth_revoked",
        QuickslotError::Upstream { .. } => "upstream",
        QuickslotError::FeatureDisabled(_) => "feature_disabled",
        QuickslotError::Config(_) => "config",
        QuickslotError::Network(_) => "network",
        QuickslotError::InvalidInput(_) => "invalid_input",
        QuickslotError::Internal(_) => "internal",
    }
}
