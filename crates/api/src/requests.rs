//! Boundary request/response schema.
//!
//! One strict, versioned schema for "parse text and create an event",
//! validated before anything reaches the core pipeline. Unknown fields are
//! rejected rather than ignored, and the text/parsed alternatives are
//! mutually exclusive.

use chrono::{DateTime, Utc};
use quickslot_core::CreateRequest;
use quickslot_domain::{CreatedEvent, ParsedInterval, QuickslotError, Result};
use serde::{Deserialize, Serialize};

/// Create-event request from the boundary layer.
///
/// Exactly one of `text` and `parsed` must be present; `timezone_hint` only
/// applies to the text form.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEventRequest {
    pub text: Option<String>,
    #[serde(rename = "timezoneHint")]
    pub timezone_hint: Option<String>,
    pub parsed: Option<IntervalPayload>,
}

impl CreateEventRequest {
    /// Validate the request and convert it into a core pipeline request.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a missing/ambiguous body or malformed
    /// timestamps.
    pub fn into_core_request(self) -> Result<CreateRequest> {
        match (self.text, self.parsed) {
            (Some(_), Some(_)) => Err(QuickslotError::InvalidInput(
                "request must carry either text or parsed, not both".to_string(),
            )),
            (None, None) => Err(QuickslotError::InvalidInput(
                "request must carry text or a parsed interval".to_string(),
            )),
            (Some(text), None) => {
                if text.trim().is_empty() {
                    return Err(QuickslotError::InvalidInput("text must not be empty".to_string()));
                }
                Ok(CreateRequest::Text { text, timezone_hint: self.timezone_hint })
            }
            (None, Some(parsed)) => Ok(CreateRequest::Parsed(parsed.into_interval()?)),
        }
    }
}

/// Wire shape of a parsed interval (both directions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntervalPayload {
    pub title: String,
    #[serde(rename = "startISO")]
    pub start_iso: String,
    #[serde(rename = "endISO")]
    pub end_iso: String,
    pub timezone: String,
    #[serde(rename = "allDay", default)]
    pub all_day: bool,
}

impl IntervalPayload {
    fn into_interval(self) -> Result<ParsedInterval> {
        Ok(ParsedInterval {
            title: self.title,
            start: parse_instant(&self.start_iso, "startISO")?,
            end: parse_instant(&self.end_iso, "endISO")?,
            timezone: self.timezone,
            all_day: self.all_day,
        })
    }

    fn from_interval(interval: &ParsedInterval) -> Self {
        Self {
            title: interval.title.clone(),
            start_iso: interval.start.to_rfc3339(),
            end_iso: interval.end.to_rfc3339(),
            timezone: interval.timezone.clone(),
            all_day: interval.all_day,
        }
    }
}

fn parse_instant(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| QuickslotError::InvalidInput(format!("invalid {field}: {e}")))
}

/// Created-event wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPayload {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Create-event response: `ok` plus either the success payload or a
/// normalized error triple.
#[derive(Debug, Clone, Serialize)]
pub struct CreateEventResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed: Option<IntervalPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<CreatedPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CreateEventResponse {
    /// Build the success response.
    #[must_use]
    pub fn success(parsed: &ParsedInterval, created: &CreatedEvent) -> Self {
        Self {
            ok: true,
            parsed: Some(IntervalPayload::from_interval(parsed)),
            created: Some(CreatedPayload {
                id: created.remote_id.clone(),
                link: created.link.clone(),
            }),
            code: None,
            message: None,
            hint: None,
        }
    }

    /// Build the failure response for a pipeline error.
    #[must_use]
    pub fn failure(error: &QuickslotError) -> Self {
        let (code, hint) = error_code(error);
        Self {
            ok: false,
            parsed: None,
            created: None,
            code: Some(code),
            message: Some(error.to_string()),
            hint,
        }
    }
}

/// Map a domain error onto the wire code set, with a human hint when the
/// failure class has a known remedy.
fn error_code(error: &QuickslotError) -> (String, Option<String>) {
    match error {
        QuickslotError::Parse(_) => ("parse_failed".to_string(), None),
        QuickslotError::InvalidTimeRange(_) => ("invalid_time_range".to_string(), None),
        QuickslotError::DurationTooLong(_) => ("duration_too_long".to_string(), None),
        QuickslotError::NotConnected(_) => (
            "not_connected".to_string(),
            Some("Connect your Google Calendar to create events.".to_string()),
        ),
        QuickslotError::AuthRevoked(_) => (
            "not_connected".to_string(),
            Some("Calendar access was revoked; reconnect your Google account.".to_string()),
        ),
        // Provider codes pass through verbatim
        QuickslotError::Upstream { code, .. } => (code.clone(), None),
        QuickslotError::FeatureDisabled(_) => ("feature_disabled".to_string(), None),
        QuickslotError::Config(_) => ("config_error".to_string(), None),
        QuickslotError::Network(_) => ("network_error".to_string(), None),
        QuickslotError::InvalidInput(_) => ("invalid_request".to_string(), None),
        QuickslotError::Internal(_) => ("internal_error".to_string(), None),
    }
}
