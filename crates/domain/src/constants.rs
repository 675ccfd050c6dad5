//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Token lifecycle
/// Lead time before access-token expiry at which a credential is treated as
/// stale and refreshed.
pub const TOKEN_REFRESH_SKEW_SECONDS: i64 = 120;

// Interval policy
/// Hard cap on the span of a single created event.
pub const MAX_EVENT_SPAN_DAYS: i64 = 14;
/// Duration assumed when a temporal expression carries only a start time.
pub const DEFAULT_EVENT_DURATION_MINUTES: i64 = 60;

// Timezone resolution
/// Fallback timezone when neither the text nor the caller supplies one.
pub const DEFAULT_TIMEZONE: &str = "UTC";
