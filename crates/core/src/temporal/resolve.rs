//! Timezone resolution and instant construction for parsed candidates.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use quickslot_domain::constants::DEFAULT_TIMEZONE;

use super::patterns::ZoneToken;

/// Zone an interval is resolved in: a named IANA zone or a fixed offset
/// spelled out in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedZone {
    Named(chrono_tz::Tz),
    Fixed(FixedOffset),
}

impl ResolvedZone {
    /// Parse a zone label as produced by [`ResolvedZone::label`]: an IANA id,
    /// "UTC", or a fixed offset like "UTC+02:00".
    pub fn parse_label(label: &str) -> Option<Self> {
        if let Ok(tz) = chrono_tz::Tz::from_str(label) {
            return Some(Self::Named(tz));
        }
        let rest = label.strip_prefix("UTC").or_else(|| label.strip_prefix("GMT"))?;
        if rest.is_empty() {
            return Some(Self::Named(chrono_tz::Tz::UTC));
        }
        let (sign, digits) = match rest.split_at(1) {
            ("+", digits) => (1, digits),
            ("-", digits) => (-1, digits),
            _ => return None,
        };
        let (hours, minutes) = match digits.split_once(':') {
            Some((h, m)) => (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?),
            None => (digits.parse::<i32>().ok()?, 0),
        };
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).map(Self::Fixed)
    }

    /// Canonical label for this zone: the IANA id, or "UTC+hh:mm" for fixed
    /// offsets.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Named(tz) => tz.name().to_string(),
            Self::Fixed(offset) => {
                let seconds = offset.local_minus_utc();
                let sign = if seconds < 0 { '-' } else { '+' };
                let abs = seconds.abs();
                format!("UTC{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
            }
        }
    }

    /// IANA id when this zone has one; fixed offsets have none.
    #[must_use]
    pub fn iana_id(&self) -> Option<&'static str> {
        match self {
            Self::Named(tz) => Some(tz.name()),
            Self::Fixed(_) => None,
        }
    }

    /// Calendar date of an instant in this zone.
    #[must_use]
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Named(tz) => instant.with_timezone(tz).date_naive(),
            Self::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    /// Instant of a local wall-clock datetime in this zone.
    ///
    /// Ambiguous local times (DST fall-back) take the earlier instant;
    /// non-existent local times (DST spring-forward gap) shift forward one
    /// hour.
    pub(crate) fn instant(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        let local = date.and_time(time);
        match self {
            Self::Named(tz) => tz
                .from_local_datetime(&local)
                .earliest()
                .or_else(|| tz.from_local_datetime(&(local + Duration::hours(1))).earliest())
                .map(|dt| dt.with_timezone(&Utc)),
            Self::Fixed(offset) => {
                offset.from_local_datetime(&local).earliest().map(|dt| dt.with_timezone(&Utc))
            }
        }
    }
}

impl Default for ResolvedZone {
    fn default() -> Self {
        Self::Named(chrono_tz::Tz::UTC)
    }
}

/// Pick the zone for a candidate: explicit zone in the text, then the
/// caller's hint, then UTC.
pub(crate) fn select_zone(explicit: Option<ZoneToken>, hint: Option<&str>) -> ResolvedZone {
    if let Some(token) = explicit {
        return match token {
            ZoneToken::Utc => ResolvedZone::Named(chrono_tz::Tz::UTC),
            ZoneToken::Offset(seconds) => FixedOffset::east_opt(seconds)
                .map_or_else(ResolvedZone::default, ResolvedZone::Fixed),
            ZoneToken::Named(tz) => ResolvedZone::Named(tz),
        };
    }
    hint.and_then(|h| ResolvedZone::parse_label(h)).unwrap_or_else(|| {
        ResolvedZone::parse_label(DEFAULT_TIMEZONE).unwrap_or_default()
    })
}

/// Days from `from` until the requested weekday, on-or-after semantics.
///
/// A bare weekday names the next occurrence counting today; "next" forces a
/// strictly future one, so "next monday" said on a Monday lands a week out.
pub(crate) fn days_until_weekday(from: Weekday, target: Weekday, forced_next: bool) -> i64 {
    let diff = (i64::from(target.num_days_from_monday())
        - i64::from(from.num_days_from_monday()))
    .rem_euclid(7);
    if diff == 0 && forced_next {
        7
    } else {
        diff
    }
}

/// Resolve a partial date against the reference date's year.
pub(crate) fn resolve_partial_date(
    date: super::patterns::PartialDate,
    reference: NaiveDate,
) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year.unwrap_or_else(|| reference.year()), date.month, date.day)
}
