//! Google Calendar provider implementation
//!
//! Implements the core `CalendarApi` port against the Calendar v3 REST API:
//! event insert and free/busy queries. Provider failures are normalized into
//! the domain taxonomy; token-revocation-class responses become
//! `AuthRevoked` so the boundary can tell the user to reconnect.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use quickslot_core::{CalendarApi, ResolvedZone};
use quickslot_domain::{BusyPeriod, CreatedEvent, ParsedInterval, QuickslotError, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Google Calendar client.
pub struct GoogleCalendarClient {
    client: reqwest::Client,
    api_base: String,
    calendar_id: String,
}

impl GoogleCalendarClient {
    /// Create a new client targeting the user's primary calendar.
    ///
    /// # Errors
    /// Returns `Config` if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| QuickslotError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: GOOGLE_CALENDAR_API_BASE.to_string(),
            calendar_id: "primary".to_string(),
        })
    }

    /// Target a specific calendar instead of `primary`.
    #[must_use]
    pub fn with_calendar_id(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    /// Point the client at a different API base URL (for testing).
    #[cfg(test)]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn insert_event(
        &self,
        access_token: &str,
        interval: &ParsedInterval,
    ) -> Result<CreatedEvent> {
        let url = format!("{}/calendars/{}/events", self.api_base, self.calendar_id);
        let resource = EventResource::from_interval(interval);

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&resource)
            .send()
            .await
            .map_err(|e| QuickslotError::Network(format!("Google API request failed: {e}")))?;

        let status = response.status();
        debug!(status = status.as_u16(), "event insert response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status, &body));
        }

        let created: InsertedEvent = response.json().await.map_err(|e| {
            QuickslotError::InvalidInput(format!("failed to parse Google response: {e}"))
        })?;

        Ok(CreatedEvent { remote_id: created.id, link: created.html_link })
    }

    async fn free_busy(
        &self,
        access_token: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<BusyPeriod>> {
        let url = format!("{}/freeBusy", self.api_base);
        let request = FreeBusyRequest {
            time_min: rfc3339(window_start),
            time_max: rfc3339(window_end),
            items: vec![FreeBusyItem { id: self.calendar_id.clone() }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&request)
            .send()
            .await
            .map_err(|e| QuickslotError::Network(format!("Google API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_api_error(status, &body));
        }

        let parsed: FreeBusyResponse = response.json().await.map_err(|e| {
            QuickslotError::InvalidInput(format!("failed to parse Google response: {e}"))
        })?;

        let busy = parsed
            .calendars
            .get(&self.calendar_id)
            .map(|calendar| calendar.busy.as_slice())
            .unwrap_or_default()
            .iter()
            .filter_map(|window| {
                let start = DateTime::parse_from_rfc3339(&window.start).ok()?;
                let end = DateTime::parse_from_rfc3339(&window.end).ok()?;
                Some(BusyPeriod {
                    start: start.with_timezone(&Utc),
                    end: end.with_timezone(&Utc),
                })
            })
            .collect();

        Ok(busy)
    }
}

/// Map a non-success API response onto the domain taxonomy.
///
/// 401s and explicit auth reasons mean the token was revoked or lost its
/// grant; everything else passes through as an upstream failure carrying the
/// provider's own reason code.
fn classify_api_error(status: StatusCode, body: &str) -> QuickslotError {
    let parsed: Option<ApiErrorBody> = serde_json::from_str(body).ok();

    let reason = parsed
        .as_ref()
        .and_then(|b| b.error.errors.first())
        .map(|e| e.reason.clone())
        .or_else(|| parsed.as_ref().and_then(|b| b.error.status.clone()));

    let message = parsed
        .as_ref()
        .map(|b| b.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("HTTP {status}"));

    let revoked = status == StatusCode::UNAUTHORIZED
        || matches!(reason.as_deref(), Some("authError" | "unauthorized" | "invalid_grant"));

    if revoked {
        QuickslotError::AuthRevoked(message)
    } else {
        QuickslotError::Upstream {
            code: reason.unwrap_or_else(|| format!("http_{}", status.as_u16())),
            message,
        }
    }
}

fn rfc3339(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Event insert body, derived 1:1 from a [`ParsedInterval`].
#[derive(Debug, Serialize)]
struct EventResource {
    summary: String,
    start: EventDateTime,
    end: EventDateTime,
}

impl EventResource {
    fn from_interval(interval: &ParsedInterval) -> Self {
        let zone = ResolvedZone::parse_label(&interval.timezone).unwrap_or_default();

        let (start, end) = if interval.all_day {
            (
                EventDateTime::date(zone.local_date(interval.start)),
                EventDateTime::date(zone.local_date(interval.end)),
            )
        } else {
            let time_zone = zone.iana_id().map(str::to_string);
            (
                EventDateTime::timed(interval.start, time_zone.clone()),
                EventDateTime::timed(interval.end, time_zone),
            )
        };

        Self { summary: interval.title.clone(), start, end }
    }
}

/// Either `{date}` for all-day events or `{dateTime, timeZone}` otherwise.
#[derive(Debug, Serialize)]
struct EventDateTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(rename = "dateTime", skip_serializing_if = "Option::is_none")]
    date_time: Option<String>,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    time_zone: Option<String>,
}

impl EventDateTime {
    fn date(date: chrono::NaiveDate) -> Self {
        Self { date: Some(date.format("%Y-%m-%d").to_string()), date_time: None, time_zone: None }
    }

    fn timed(instant: DateTime<Utc>, time_zone: Option<String>) -> Self {
        Self { date: None, date_time: Some(rfc3339(instant)), time_zone }
    }
}

#[derive(Debug, Deserialize)]
struct InsertedEvent {
    id: String,
    #[serde(rename = "htmlLink")]
    html_link: Option<String>,
}

#[derive(Debug, Serialize)]
struct FreeBusyRequest {
    #[serde(rename = "timeMin")]
    time_min: String,
    #[serde(rename = "timeMax")]
    time_max: String,
    items: Vec<FreeBusyItem>,
}

#[derive(Debug, Serialize)]
struct FreeBusyItem {
    id: String,
}

#[derive(Debug, Deserialize)]
struct FreeBusyResponse {
    calendars: std::collections::HashMap<String, FreeBusyCalendar>,
}

#[derive(Debug, Deserialize)]
struct FreeBusyCalendar {
    #[serde(default)]
    busy: Vec<FreeBusyWindow>,
}

#[derive(Debug, Deserialize)]
struct FreeBusyWindow {
    start: String,
    end: String,
}

/// Standard Google API error envelope.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    reason: String,
}
