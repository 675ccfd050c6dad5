//! Event creation orchestration - core business logic.
//!
//! One pipeline per request: authenticate, parse, validate, create remotely.
//! Parse and validation failures are detected before any remote resource is
//! consumed; an unusable credential short-circuits before parsing. No step
//! is retried, and duplicate submissions create duplicate remote events.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use quickslot_domain::constants::MAX_EVENT_SPAN_DAYS;
use quickslot_domain::{
    BusyPeriod, CreatedEvent, Credential, ParsedInterval, QuickslotError, Result, TimeQuery,
};
use tracing::{debug, info};

use super::ports::CalendarApi;
use crate::auth::TokenLifecycle;
use crate::temporal;

/// A create request from the boundary layer: raw text to parse, or an
/// interval the caller already parsed (trusted as-is, validation still runs).
#[derive(Debug, Clone)]
pub enum CreateRequest {
    Text { text: String, timezone_hint: Option<String> },
    Parsed(ParsedInterval),
}

/// Successful pipeline result.
#[derive(Debug, Clone)]
pub struct CreateOutcome {
    pub parsed: ParsedInterval,
    pub created: CreatedEvent,
    /// Present when the stored credential was refreshed; the caller must
    /// re-persist it.
    pub refreshed_credential: Option<Credential>,
}

/// Free/busy query result, carrying the refreshed credential the same way.
#[derive(Debug, Clone)]
pub struct AvailabilityOutcome {
    pub busy: Vec<BusyPeriod>,
    pub refreshed_credential: Option<Credential>,
}

/// Event creation service.
pub struct EventService {
    lifecycle: TokenLifecycle,
    calendar: Arc<dyn CalendarApi>,
}

impl EventService {
    /// Create a new event service.
    pub fn new(lifecycle: TokenLifecycle, calendar: Arc<dyn CalendarApi>) -> Self {
        Self { lifecycle, calendar }
    }

    /// Run the full pipeline for one request.
    ///
    /// # Errors
    /// `NotConnected` when no usable credential exists, `Parse` when the text
    /// contains no temporal expression, `InvalidTimeRange`/`DurationTooLong`
    /// for intervals failing policy checks, `AuthRevoked`/`Upstream`/`Network`
    /// from the remote call.
    pub async fn create(&self, request: CreateRequest, stored: Credential) -> Result<CreateOutcome> {
        let fresh = self.lifecycle.ensure_fresh(stored).await?;

        let parsed = match request {
            CreateRequest::Parsed(interval) => interval,
            CreateRequest::Text { text, timezone_hint } => {
                let mut query = TimeQuery::new(text.as_str(), Utc::now());
                if let Some(hint) = timezone_hint {
                    query = query.with_timezone_hint(hint);
                }
                temporal::parse(&query).ok_or_else(|| {
                    debug!(text = %text, "no temporal expression recognized");
                    QuickslotError::Parse(format!("no date or time found in {text:?}"))
                })?
            }
        };

        validate_interval(&parsed)?;

        let access_token = fresh
            .credential
            .access_token
            .clone()
            .ok_or_else(|| QuickslotError::Internal("fresh credential has no access token".to_string()))?;

        let created = self.calendar.insert_event(&access_token, &parsed).await?;
        info!(
            remote_id = %created.remote_id,
            all_day = parsed.all_day,
            refreshed = fresh.refreshed,
            "calendar event created"
        );

        Ok(CreateOutcome {
            parsed,
            created,
            refreshed_credential: fresh.refreshed.then_some(fresh.credential),
        })
    }

    /// Query busy periods in a window, through the same auth path as event
    /// creation.
    ///
    /// # Errors
    /// Same failure surface as [`EventService::create`], minus parsing.
    pub async fn free_busy(
        &self,
        stored: Credential,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<AvailabilityOutcome> {
        if window_end <= window_start {
            return Err(QuickslotError::InvalidTimeRange(
                "free/busy window end must be after start".to_string(),
            ));
        }

        let fresh = self.lifecycle.ensure_fresh(stored).await?;
        let access_token = fresh
            .credential
            .access_token
            .clone()
            .ok_or_else(|| QuickslotError::Internal("fresh credential has no access token".to_string()))?;

        let busy = self.calendar.free_busy(&access_token, window_start, window_end).await?;

        Ok(AvailabilityOutcome {
            busy,
            refreshed_credential: fresh.refreshed.then_some(fresh.credential),
        })
    }
}

/// Policy checks on a parsed interval, run strictly before any remote call.
fn validate_interval(interval: &ParsedInterval) -> Result<()> {
    if interval.end <= interval.start {
        return Err(QuickslotError::InvalidTimeRange(
            "event end must be after its start".to_string(),
        ));
    }
    if interval.duration() > Duration::days(MAX_EVENT_SPAN_DAYS) {
        return Err(QuickslotError::DurationTooLong(format!(
            "events may span at most {MAX_EVENT_SPAN_DAYS} days"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Unit tests for interval validation.
    use chrono::TimeZone;

    use super::*;

    fn interval(hours: i64) -> ParsedInterval {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 14, 0, 0).unwrap();
        ParsedInterval {
            title: "test".to_string(),
            start,
            end: start + Duration::hours(hours),
            timezone: "UTC".to_string(),
            all_day: false,
        }
    }

    #[test]
    fn test_validate_accepts_ordinary_interval() {
        assert!(validate_interval(&interval(2)).is_ok());
    }

    #[test]
    fn test_validate_rejects_reversed_interval() {
        let result = validate_interval(&interval(-1));
        assert!(matches!(result, Err(QuickslotError::InvalidTimeRange(_))));

        let result = validate_interval(&interval(0));
        assert!(matches!(result, Err(QuickslotError::InvalidTimeRange(_))));
    }

    #[test]
    fn test_validate_rejects_overlong_interval() {
        let result = validate_interval(&interval(15 * 24));
        assert!(matches!(result, Err(QuickslotError::DurationTooLong(_))));

        // 14 days exactly is still allowed
        assert!(validate_interval(&interval(14 * 24)).is_ok());
    }
}
