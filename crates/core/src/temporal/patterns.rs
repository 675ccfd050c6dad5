//! Regex-based extraction of temporal components from free text.
//!
//! Each pattern contributes typed tokens with byte spans. Overlapping matches
//! are resolved by a fixed priority order (more specific patterns first), so
//! the digits of an ISO date are never re-read as a clock-time range.

use std::str::FromStr;

use chrono::Weekday;
use once_cell::sync::Lazy;
use regex::Regex;

const MONTHS: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";

static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{4})-(\d{2})-(\d{2})\b").expect("ISO_DATE_RE should compile - this is a bug")
});

static MONTH_DAY_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTHS})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?\s*(?:-|–|—|to|until)\s*(\d{{1,2}})(?:st|nd|rd|th)?\b"
    ))
    .expect("MONTH_DAY_RANGE_RE should compile - this is a bug")
});

static MONTH_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b({MONTHS})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?(?:,?\s+(\d{{4}}))?\b"
    ))
    .expect("MONTH_DAY_RE should compile - this is a bug")
});

static DAY_MONTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)\b(\d{{1,2}})(?:st|nd|rd|th)?\s+({MONTHS})(?:\s+(\d{{4}}))?\b"
    ))
    .expect("DAY_MONTH_RE should compile - this is a bug")
});

static TIME_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\s*(?:-|–|—|to|until|till)\s*(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b",
    )
    .expect("TIME_RANGE_RE should compile - this is a bug")
});

static TIME_12H_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)\b")
        .expect("TIME_12H_RE should compile - this is a bug")
});

static TIME_24H_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,2}):(\d{2})\b").expect("TIME_24H_RE should compile - this is a bug")
});

static RELATIVE_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(day\s+after\s+tomorrow|tomorrow|tonight|today|yesterday)\b")
        .expect("RELATIVE_DAY_RE should compile - this is a bug")
});

static WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(next|this)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday|mon|tues|tue|wed|thurs|thur|thu|fri|sat|sun)\b",
    )
    .expect("WEEKDAY_RE should compile - this is a bug")
});

static ALL_DAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\ball[\s-]+day\b").expect("ALL_DAY_RE should compile - this is a bug")
});

static UTC_OFFSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:utc|gmt)(?:\s*([+-])(\d{1,2})(?::?(\d{2}))?)?\b")
        .expect("UTC_OFFSET_RE should compile - this is a bug")
});

static BARE_OFFSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([+-])(\d{2}):(\d{2})").expect("BARE_OFFSET_RE should compile - this is a bug")
});

static IANA_ZONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z]+(?:_[A-Za-z]+)*/[A-Za-z]+(?:[_+-][A-Za-z0-9]+)*\b")
        .expect("IANA_ZONE_RE should compile - this is a bug")
});

/// Half of a 12/24-hour clock expression, before day resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClockToken {
    pub hour: u32,
    pub minute: u32,
    pub meridiem: Option<Meridiem>,
    /// Whether minutes were spelled out ("2:30" vs "2").
    pub explicit_minutes: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    fn opposite(self) -> Self {
        match self {
            Self::Am => Self::Pm,
            Self::Pm => Self::Am,
        }
    }
}

impl ClockToken {
    fn is_plausible(&self) -> bool {
        let hour_ok = match self.meridiem {
            Some(_) => (1..=12).contains(&self.hour),
            None => self.hour < 24,
        };
        hour_ok && self.minute < 60
    }

    /// Convert to 24-hour clock, borrowing a meridiem when this token has
    /// none of its own.
    pub(crate) fn to_naive(&self, borrowed: Option<Meridiem>) -> Option<chrono::NaiveTime> {
        let meridiem = self.meridiem.or(borrowed);
        let hour = match meridiem {
            Some(Meridiem::Pm) if self.hour < 12 => self.hour + 12,
            Some(Meridiem::Am) if self.hour == 12 => 0,
            _ => self.hour,
        };
        chrono::NaiveTime::from_hms_opt(hour, self.minute, 0)
    }
}

/// Resolve a clock range to concrete times.
///
/// A bare start hour inherits the end's meridiem when that keeps the range
/// forward ("2-4pm" is 14:00-16:00); otherwise the opposite meridiem is tried
/// ("11-1pm" is 11:00-13:00). Returns `(start, end, overnight)` where
/// `overnight` marks ranges that wrap past midnight ("11pm-1am").
pub(crate) fn resolve_clock_range(
    start: ClockToken,
    end: ClockToken,
) -> Option<(chrono::NaiveTime, chrono::NaiveTime, bool)> {
    let end_time = end.to_naive(None)?;

    let start_time = if start.meridiem.is_some() {
        start.to_naive(None)?
    } else if let Some(meridiem) = end.meridiem {
        let inherited = start.to_naive(Some(meridiem))?;
        if inherited < end_time {
            inherited
        } else {
            let flipped = start.to_naive(Some(meridiem.opposite()))?;
            if flipped < end_time {
                flipped
            } else {
                start.to_naive(None)?
            }
        }
    } else {
        start.to_naive(None)?
    };

    Some((start_time, end_time, end_time <= start_time))
}

/// A calendar date with the year possibly left to the reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PartialDate {
    pub year: Option<i32>,
    pub month: u32,
    pub day: u32,
}

/// Timezone named in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ZoneToken {
    Utc,
    /// Seconds east of UTC.
    Offset(i32),
    Named(chrono_tz::Tz),
}

/// One temporal component matched in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    TimeRange { start: ClockToken, end: ClockToken },
    Time(ClockToken),
    /// Day offset from the reference date (tomorrow = 1).
    RelativeDay(i64),
    Weekday { weekday: Weekday, forced_next: bool },
    Date(PartialDate),
    DateRange { start: PartialDate, end: PartialDate },
    AllDay,
    Zone(ZoneToken),
}

/// A matched component with its byte span in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TemporalToken {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl TemporalToken {
    fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// Scan the input for temporal components, returning non-overlapping tokens
/// sorted by position.
pub(crate) fn scan(text: &str) -> Vec<TemporalToken> {
    let mut tokens: Vec<TemporalToken> = Vec::new();

    let push = |kind: Option<TokenKind>, start: usize, end: usize, tokens: &mut Vec<TemporalToken>| {
        let Some(kind) = kind else { return };
        if tokens.iter().any(|t| t.overlaps(start, end)) {
            return;
        }
        tokens.push(TemporalToken { kind, start, end });
    };

    for caps in ISO_DATE_RE.captures_iter(text) {
        let m = caps.get(0).map(|m| (m.start(), m.end()));
        let Some((start, end)) = m else { continue };
        let kind = parse_iso_date(&caps);
        push(kind, start, end, &mut tokens);
    }

    for caps in MONTH_DAY_RANGE_RE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let kind = parse_month_day_range(&caps);
        push(kind, m.start(), m.end(), &mut tokens);
    }

    for caps in MONTH_DAY_RE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let kind = parse_month_day(&caps);
        push(kind, m.start(), m.end(), &mut tokens);
    }

    for caps in DAY_MONTH_RE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let kind = parse_day_month(&caps);
        push(kind, m.start(), m.end(), &mut tokens);
    }

    for caps in TIME_RANGE_RE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let kind = parse_time_range(&caps);
        push(kind, m.start(), m.end(), &mut tokens);
    }

    for caps in TIME_12H_RE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let kind = parse_time_12h(&caps);
        push(kind, m.start(), m.end(), &mut tokens);
    }

    for caps in TIME_24H_RE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let kind = parse_time_24h(&caps);
        push(kind, m.start(), m.end(), &mut tokens);
    }

    for caps in RELATIVE_DAY_RE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let kind = caps.get(1).map(|w| {
            let word = w.as_str().to_ascii_lowercase();
            let days = match word.as_str() {
                "yesterday" => -1,
                "today" | "tonight" => 0,
                "tomorrow" => 1,
                _ => 2, // "day after tomorrow"
            };
            TokenKind::RelativeDay(days)
        });
        push(kind, m.start(), m.end(), &mut tokens);
    }

    for caps in WEEKDAY_RE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let kind = parse_weekday(&caps);
        push(kind, m.start(), m.end(), &mut tokens);
    }

    for m in ALL_DAY_RE.find_iter(text) {
        push(Some(TokenKind::AllDay), m.start(), m.end(), &mut tokens);
    }

    for caps in UTC_OFFSET_RE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let kind = parse_utc_offset(&caps);
        push(kind, m.start(), m.end(), &mut tokens);
    }

    for caps in BARE_OFFSET_RE.captures_iter(text) {
        let Some(m) = caps.get(0) else { continue };
        let kind = parse_bare_offset(&caps);
        push(kind, m.start(), m.end(), &mut tokens);
    }

    for m in IANA_ZONE_RE.find_iter(text) {
        let kind = chrono_tz::Tz::from_str(m.as_str())
            .ok()
            .map(|tz| TokenKind::Zone(ZoneToken::Named(tz)));
        push(kind, m.start(), m.end(), &mut tokens);
    }

    tokens.sort_by_key(|t| t.start);
    tokens
}

fn capture_u32(caps: &regex::Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index).and_then(|m| m.as_str().parse().ok())
}

fn parse_iso_date(caps: &regex::Captures<'_>) -> Option<TokenKind> {
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let month = capture_u32(caps, 2)?;
    let day = capture_u32(caps, 3)?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    Some(TokenKind::Date(PartialDate { year: Some(year), month, day }))
}

fn parse_month_day_range(caps: &regex::Captures<'_>) -> Option<TokenKind> {
    let month = month_number(caps.get(1)?.as_str())?;
    let first = capture_u32(caps, 2)?;
    let second = capture_u32(caps, 3)?;
    if !(1..=31).contains(&first) || !(1..=31).contains(&second) {
        return None;
    }
    Some(TokenKind::DateRange {
        start: PartialDate { year: None, month, day: first },
        end: PartialDate { year: None, month, day: second },
    })
}

fn parse_month_day(caps: &regex::Captures<'_>) -> Option<TokenKind> {
    let month = month_number(caps.get(1)?.as_str())?;
    let day = capture_u32(caps, 2)?;
    if !(1..=31).contains(&day) {
        return None;
    }
    let year = caps.get(3).and_then(|m| m.as_str().parse().ok());
    Some(TokenKind::Date(PartialDate { year, month, day }))
}

fn parse_day_month(caps: &regex::Captures<'_>) -> Option<TokenKind> {
    let day = capture_u32(caps, 1)?;
    let month = month_number(caps.get(2)?.as_str())?;
    if !(1..=31).contains(&day) {
        return None;
    }
    let year = caps.get(3).and_then(|m| m.as_str().parse().ok());
    Some(TokenKind::Date(PartialDate { year, month, day }))
}

fn parse_time_range(caps: &regex::Captures<'_>) -> Option<TokenKind> {
    let start = ClockToken {
        hour: capture_u32(caps, 1)?,
        minute: capture_u32(caps, 2).unwrap_or(0),
        meridiem: parse_meridiem(caps.get(3)),
        explicit_minutes: caps.get(2).is_some(),
    };
    let end = ClockToken {
        hour: capture_u32(caps, 4)?,
        minute: capture_u32(caps, 5).unwrap_or(0),
        meridiem: parse_meridiem(caps.get(6)),
        explicit_minutes: caps.get(5).is_some(),
    };
    if !start.is_plausible() || !end.is_plausible() {
        return None;
    }
    // Bare "10-12" is a page range as often as a clock range; require a
    // meridiem or explicit minutes somewhere before reading it as time.
    let anchored = start.meridiem.is_some()
        || end.meridiem.is_some()
        || start.explicit_minutes
        || end.explicit_minutes;
    if !anchored {
        return None;
    }
    Some(TokenKind::TimeRange { start, end })
}

fn parse_time_12h(caps: &regex::Captures<'_>) -> Option<TokenKind> {
    let token = ClockToken {
        hour: capture_u32(caps, 1)?,
        minute: capture_u32(caps, 2).unwrap_or(0),
        meridiem: parse_meridiem(caps.get(3)),
        explicit_minutes: caps.get(2).is_some(),
    };
    token.is_plausible().then_some(TokenKind::Time(token))
}

fn parse_time_24h(caps: &regex::Captures<'_>) -> Option<TokenKind> {
    let token = ClockToken {
        hour: capture_u32(caps, 1)?,
        minute: capture_u32(caps, 2)?,
        meridiem: None,
        explicit_minutes: true,
    };
    token.is_plausible().then_some(TokenKind::Time(token))
}

fn parse_meridiem(m: Option<regex::Match<'_>>) -> Option<Meridiem> {
    m.map(|m| {
        if m.as_str().eq_ignore_ascii_case("am") {
            Meridiem::Am
        } else {
            Meridiem::Pm
        }
    })
}

fn parse_weekday(caps: &regex::Captures<'_>) -> Option<TokenKind> {
    let forced_next = caps
        .get(1)
        .is_some_and(|m| m.as_str().eq_ignore_ascii_case("next"));
    let weekday = match caps.get(2)?.as_str().to_ascii_lowercase().as_str() {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tues" | "tue" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thurs" | "thur" | "thu" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(TokenKind::Weekday { weekday, forced_next })
}

fn parse_utc_offset(caps: &regex::Captures<'_>) -> Option<TokenKind> {
    let Some(sign) = caps.get(1) else {
        return Some(TokenKind::Zone(ZoneToken::Utc));
    };
    let hours: i32 = caps.get(2)?.as_str().parse().ok()?;
    let minutes: i32 = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    let mut seconds = hours * 3600 + minutes * 60;
    if sign.as_str() == "-" {
        seconds = -seconds;
    }
    Some(TokenKind::Zone(ZoneToken::Offset(seconds)))
}

fn parse_bare_offset(caps: &regex::Captures<'_>) -> Option<TokenKind> {
    let hours: i32 = caps.get(2)?.as_str().parse().ok()?;
    let minutes: i32 = caps.get(3)?.as_str().parse().ok()?;
    if hours > 14 || minutes > 59 {
        return None;
    }
    let mut seconds = hours * 3600 + minutes * 60;
    if caps.get(1)?.as_str() == "-" {
        seconds = -seconds;
    }
    Some(TokenKind::Zone(ZoneToken::Offset(seconds)))
}

fn month_number(name: &str) -> Option<u32> {
    let lowered = name.to_ascii_lowercase();
    let number = match lowered.as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    //! Unit tests for temporal::patterns.
    use chrono::NaiveTime;

    use super::*;

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_range_inherits_end_meridiem() {
        let start = ClockToken { hour: 2, minute: 0, meridiem: None, explicit_minutes: false };
        let end =
            ClockToken { hour: 4, minute: 0, meridiem: Some(Meridiem::Pm), explicit_minutes: false };

        let (s, e, overnight) = resolve_clock_range(start, end).unwrap();
        assert_eq!(s, time(14, 0));
        assert_eq!(e, time(16, 0));
        assert!(!overnight);
    }

    #[test]
    fn test_range_flips_meridiem_across_noon() {
        // "11-1pm" reads as 11:00-13:00, not 23:00-13:00
        let start = ClockToken { hour: 11, minute: 0, meridiem: None, explicit_minutes: false };
        let end =
            ClockToken { hour: 1, minute: 0, meridiem: Some(Meridiem::Pm), explicit_minutes: false };

        let (s, e, overnight) = resolve_clock_range(start, end).unwrap();
        assert_eq!(s, time(11, 0));
        assert_eq!(e, time(13, 0));
        assert!(!overnight);
    }

    #[test]
    fn test_range_marks_overnight_wrap() {
        let start =
            ClockToken { hour: 11, minute: 0, meridiem: Some(Meridiem::Pm), explicit_minutes: false };
        let end =
            ClockToken { hour: 1, minute: 0, meridiem: Some(Meridiem::Am), explicit_minutes: false };

        let (s, e, overnight) = resolve_clock_range(start, end).unwrap();
        assert_eq!(s, time(23, 0));
        assert_eq!(e, time(1, 0));
        assert!(overnight);
    }

    #[test]
    fn test_scan_finds_time_range_and_relative_day() {
        let tokens = scan("block 2-4pm tomorrow");
        assert_eq!(tokens.len(), 2);
        assert!(matches!(tokens[0].kind, TokenKind::TimeRange { .. }));
        assert!(matches!(tokens[1].kind, TokenKind::RelativeDay(1)));
    }

    #[test]
    fn test_scan_ignores_bare_number_ranges() {
        // Without a meridiem or minutes this is a page range, not a clock range
        let tokens = scan("read pages 10-12");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_scan_iso_date_wins_over_time_range() {
        let tokens = scan("2024-01-05 review");
        assert_eq!(tokens.len(), 1);
        assert_eq!(
            tokens[0].kind,
            TokenKind::Date(PartialDate { year: Some(2024), month: 1, day: 5 })
        );
    }

    #[test]
    fn test_scan_month_day_range() {
        let tokens = scan("offsite Jan 5-7");
        assert_eq!(tokens.len(), 1);
        assert_eq!(
            tokens[0].kind,
            TokenKind::DateRange {
                start: PartialDate { year: None, month: 1, day: 5 },
                end: PartialDate { year: None, month: 1, day: 7 },
            }
        );
    }

    #[test]
    fn test_scan_weekday_forms() {
        let tokens = scan("next wednesday");
        assert_eq!(
            tokens[0].kind,
            TokenKind::Weekday { weekday: Weekday::Wed, forced_next: true }
        );

        let tokens = scan("fri standup");
        assert_eq!(
            tokens[0].kind,
            TokenKind::Weekday { weekday: Weekday::Fri, forced_next: false }
        );

        // Word-boundary check: "monitor" must not read as "mon"
        assert!(scan("check the monitor").is_empty());
    }

    #[test]
    fn test_scan_zone_tokens() {
        let tokens = scan("2pm UTC+2");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].kind, TokenKind::Zone(ZoneToken::Offset(7200)));

        let tokens = scan("9am Europe/Madrid");
        assert_eq!(tokens[1].kind, TokenKind::Zone(ZoneToken::Named(chrono_tz::Europe::Madrid)));

        let tokens = scan("9am utc");
        assert_eq!(tokens[1].kind, TokenKind::Zone(ZoneToken::Utc));
    }

    #[test]
    fn test_scan_rejects_invalid_clock_values() {
        assert!(scan("meet at 27:80").is_empty());
        assert!(scan("45pm").is_empty());
    }

    #[test]
    fn test_scan_day_after_tomorrow_is_single_token() {
        let tokens = scan("day after tomorrow");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::RelativeDay(2));
    }

    #[test]
    fn test_month_number_aliases() {
        assert_eq!(month_number("September"), Some(9));
        assert_eq!(month_number("sept"), Some(9));
        assert_eq!(month_number("sep"), Some(9));
        assert_eq!(month_number("notamonth"), None);
    }
}
