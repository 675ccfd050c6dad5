//! Calendar provider port interfaces.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quickslot_domain::{BusyPeriod, CreatedEvent, ParsedInterval, Result};

/// Trait for calendar provider operations.
///
/// Implementations translate the domain interval into the provider's wire
/// representation (date-only fields for all-day, zoned datetimes otherwise).
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Insert an event into the user's primary calendar.
    ///
    /// # Errors
    /// Returns `AuthRevoked` for token-revocation-class provider errors,
    /// `Upstream` for other provider failures, `Network` for transport
    /// failures.
    async fn insert_event(
        &self,
        access_token: &str,
        interval: &ParsedInterval,
    ) -> Result<CreatedEvent>;

    /// Query busy periods within a time window.
    async fn free_busy(
        &self,
        access_token: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<BusyPeriod>>;
}
