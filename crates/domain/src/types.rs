//! Common data types used throughout the application

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A natural-language time lookup, anchored at a reference instant.
///
/// Constructed fresh per request and discarded once parsing completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeQuery {
    /// Free text to scan for a temporal expression.
    pub text: String,
    /// Instant relative expressions ("tomorrow", "next friday") resolve
    /// against.
    pub reference: DateTime<Utc>,
    /// IANA zone id supplied by the caller, used when the text itself names
    /// no zone.
    pub timezone_hint: Option<String>,
}

impl TimeQuery {
    /// Creates a query anchored at the given reference instant.
    pub fn new(text: impl Into<String>, reference: DateTime<Utc>) -> Self {
        Self { text: text.into(), reference, timezone_hint: None }
    }

    /// Sets the caller's timezone hint.
    #[must_use]
    pub fn with_timezone_hint(mut self, hint: impl Into<String>) -> Self {
        self.timezone_hint = Some(hint.into());
        self
    }
}

/// A bounded calendar interval produced by the temporal parser.
///
/// For timed intervals `end > start`. For all-day intervals both instants
/// are zone-midnight and `end` is the exclusive end date, one calendar day
/// after the last included date. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedInterval {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Zone the interval was resolved in: an IANA id, or a fixed offset
    /// ("UTC+02:00") when the text spelled one out.
    pub timezone: String,
    pub all_day: bool,
}

impl ParsedInterval {
    /// Span of the interval.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Stored OAuth credential for the calendar provider.
///
/// Usable only when at least one token is present. Loaded from the caller's
/// persistence adapter at the start of a request; a refreshed copy may be
/// handed back at the end for re-persistence. The wire format matches the
/// persistence contract: `access_token`, `refresh_token`, and `expiry_date`
/// in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Credential {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub access_token: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub refresh_token: Option<String>,

    /// Absolute access-token expiry (UTC). Serialized as `expiry_date` in
    /// epoch milliseconds.
    #[serde(
        rename = "expiry_date",
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    /// Whether this credential can possibly authenticate a request.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.access_token.is_some() || self.refresh_token.is_some()
    }

    /// Check if the access token is expired or will expire within the given
    /// threshold.
    ///
    /// Returns `false` when no expiry is recorded; staleness of unknown-expiry
    /// credentials is decided by the token lifecycle, which also knows whether
    /// a refresh token is available.
    #[must_use]
    pub fn is_expiring_within(&self, threshold_seconds: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now() + Duration::seconds(threshold_seconds) >= expires_at,
            None => false,
        }
    }
}

/// Remote event handle returned by the calendar provider on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEvent {
    /// Provider-assigned event id.
    pub remote_id: String,
    /// Browser link to the created event, when the provider returns one.
    pub link: Option<String>,
}

/// A busy window reported by the provider's free/busy query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    //! Unit tests for domain types.
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_credential_usability() {
        let empty = Credential::default();
        assert!(!empty.is_usable());

        let access_only =
            Credential { access_token: Some("token".to_string()), ..Credential::default() };
        assert!(access_only.is_usable());

        let refresh_only =
            Credential { refresh_token: Some("refresh".to_string()), ..Credential::default() };
        assert!(refresh_only.is_usable());
    }

    #[test]
    fn test_credential_expiry_threshold() {
        let soon = Credential {
            access_token: Some("token".to_string()),
            refresh_token: Some("refresh".to_string()),
            expires_at: Some(Utc::now() + Duration::seconds(30)),
        };
        // 30s out is inside a 2 minute threshold, outside a 10s one
        assert!(soon.is_expiring_within(120));
        assert!(!soon.is_expiring_within(10));

        let far = Credential {
            access_token: Some("token".to_string()),
            refresh_token: Some("refresh".to_string()),
            expires_at: Some(Utc::now() + Duration::minutes(10)),
        };
        assert!(!far.is_expiring_within(120));
    }

    #[test]
    fn test_credential_no_expiry_is_not_stale() {
        let credential =
            Credential { access_token: Some("token".to_string()), ..Credential::default() };
        assert!(!credential.is_expiring_within(120));
    }

    /// The persistence adapter stores `expiry_date` as epoch milliseconds;
    /// the serde representation must round-trip that format exactly.
    #[test]
    fn test_credential_wire_format() {
        let expires_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let credential = Credential {
            access_token: Some("ya29.token".to_string()),
            refresh_token: Some("1//refresh".to_string()),
            expires_at: Some(expires_at),
        };

        let json = serde_json::to_value(&credential).unwrap();
        assert_eq!(json["access_token"], "ya29.token");
        assert_eq!(json["refresh_token"], "1//refresh");
        assert_eq!(json["expiry_date"], expires_at.timestamp_millis());

        let decoded: Credential = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, credential);
    }

    #[test]
    fn test_credential_wire_format_omits_missing_fields() {
        let credential =
            Credential { access_token: Some("token".to_string()), ..Credential::default() };

        let json = serde_json::to_value(&credential).unwrap();
        assert!(json.get("refresh_token").is_none());
        assert!(json.get("expiry_date").is_none());

        let decoded: Credential = serde_json::from_str(r#"{"access_token":"token"}"#).unwrap();
        assert_eq!(decoded, credential);
    }

    #[test]
    fn test_parsed_interval_duration() {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 14, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 2, 16, 0, 0).unwrap();
        let interval = ParsedInterval {
            title: "Deep Work".to_string(),
            start,
            end,
            timezone: "UTC".to_string(),
            all_day: false,
        };

        assert_eq!(interval.duration(), Duration::hours(2));
    }
}
