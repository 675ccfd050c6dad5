//! Natural-language temporal expression parsing.
//!
//! Turns free text like "block 2-4pm tomorrow — Deep Work thesis" into a
//! bounded [`ParsedInterval`], anchored at the caller's reference instant.
//! Pure and deterministic: no I/O, no clock reads, no allocation beyond the
//! result.

mod patterns;
mod resolve;

use chrono::{Datelike, Duration, NaiveTime};
use quickslot_domain::constants::DEFAULT_EVENT_DURATION_MINUTES;
use quickslot_domain::{ParsedInterval, TimeQuery};

use self::patterns::{resolve_clock_range, scan, ClockToken, PartialDate, TemporalToken, TokenKind, ZoneToken};
pub use self::resolve::ResolvedZone;
use self::resolve::{days_until_weekday, resolve_partial_date, select_zone};

/// Parse the leftmost temporal expression in the query text.
///
/// **First-match rule**: when a text contains several temporal expressions,
/// only the leftmost candidate cluster is used; everything after the first
/// non-temporal word is ignored. This is a documented policy, not an error.
///
/// Returns `None` when no temporal expression is recognized; absence of a
/// match is an expected outcome, never an error.
#[must_use]
pub fn parse(query: &TimeQuery) -> Option<ParsedInterval> {
    let tokens = scan(&query.text);
    let cluster = leftmost_cluster(&query.text, &tokens)?;

    let mut zone_token: Option<ZoneToken> = None;
    let mut time: Option<TimeSpec> = None;
    let mut dates: Vec<DateSpec> = Vec::new();
    let mut all_day_marker = false;

    for token in cluster {
        match &token.kind {
            TokenKind::TimeRange { start, end } => {
                if time.is_none() {
                    time = Some(TimeSpec::Range { start: *start, end: *end });
                }
            }
            TokenKind::Time(clock) => {
                if time.is_none() {
                    time = Some(TimeSpec::Single(*clock));
                }
            }
            TokenKind::RelativeDay(days) => dates.push(DateSpec::Relative(*days)),
            TokenKind::Weekday { weekday, forced_next } => {
                dates.push(DateSpec::Weekday { weekday: *weekday, forced_next: *forced_next });
            }
            TokenKind::Date(date) => dates.push(DateSpec::Partial(*date)),
            TokenKind::DateRange { start, end } => {
                dates.push(DateSpec::Partial(*start));
                dates.push(DateSpec::Partial(*end));
            }
            TokenKind::AllDay => all_day_marker = true,
            TokenKind::Zone(zone) => {
                if zone_token.is_none() {
                    zone_token = Some(*zone);
                }
            }
        }
    }

    // A cluster of only zone names or an "all day" marker names no moment
    if time.is_none() && dates.is_empty() && !all_day_marker {
        return None;
    }

    let zone = select_zone(zone_token, query.timezone_hint.as_deref());
    let reference_date = zone.local_date(query.reference);

    let start_date = match dates.first() {
        Some(spec) => spec.resolve(reference_date)?,
        None => reference_date,
    };
    let end_date = match dates.last() {
        Some(spec) if dates.len() > 1 => spec.resolve(reference_date)?,
        _ => start_date,
    };

    let span = cluster_span(cluster);
    let title = derive_title(&query.text, span.0, span.1);

    let (start, end, all_day) = match time {
        Some(TimeSpec::Range { start: start_clock, end: end_clock }) => {
            let (start_time, end_time, overnight) = resolve_clock_range(start_clock, end_clock)?;
            let end_day = if overnight { start_date + Duration::days(1) } else { start_date };
            (
                zone.instant(start_date, start_time)?,
                zone.instant(end_day, end_time)?,
                false,
            )
        }
        Some(TimeSpec::Single(clock)) => {
            let start = zone.instant(start_date, clock.to_naive(None)?)?;
            (start, start + Duration::minutes(DEFAULT_EVENT_DURATION_MINUTES), false)
        }
        None => {
            let midnight = NaiveTime::MIN;
            (
                zone.instant(start_date, midnight)?,
                zone.instant(end_date + Duration::days(1), midnight)?,
                true,
            )
        }
    };

    Some(ParsedInterval { title, start, end, timezone: zone.label(), all_day })
}

#[derive(Debug, Clone, Copy)]
enum TimeSpec {
    Range { start: ClockToken, end: ClockToken },
    Single(ClockToken),
}

#[derive(Debug, Clone, Copy)]
enum DateSpec {
    Relative(i64),
    Weekday { weekday: chrono::Weekday, forced_next: bool },
    Partial(PartialDate),
}

impl DateSpec {
    fn resolve(self, reference: chrono::NaiveDate) -> Option<chrono::NaiveDate> {
        match self {
            Self::Relative(days) => Some(reference + Duration::days(days)),
            Self::Weekday { weekday, forced_next } => {
                let ahead = days_until_weekday(reference.weekday(), weekday, forced_next);
                Some(reference + Duration::days(ahead))
            }
            Self::Partial(date) => resolve_partial_date(date, reference),
        }
    }
}

/// The leftmost run of temporal tokens separated only by connector words.
fn leftmost_cluster<'a>(text: &str, tokens: &'a [TemporalToken]) -> Option<&'a [TemporalToken]> {
    let first = tokens.first()?;
    let mut end_index = 1;
    let mut previous_end = first.end;

    for token in &tokens[1..] {
        if !is_connector_gap(&text[previous_end..token.start]) {
            break;
        }
        previous_end = token.end;
        end_index += 1;
    }

    Some(&tokens[..end_index])
}

fn cluster_span(cluster: &[TemporalToken]) -> (usize, usize) {
    let start = cluster.first().map_or(0, |t| t.start);
    let end = cluster.last().map_or(0, |t| t.end);
    (start, end)
}

const CONNECTOR_WORDS: &[&str] =
    &["at", "on", "from", "until", "till", "to", "the", "of", "in", "for", "this"];

fn is_connector_word(word: &str) -> bool {
    CONNECTOR_WORDS.contains(&word)
}

/// True when the text between two tokens is only whitespace, punctuation,
/// and connector words.
fn is_connector_gap(gap: &str) -> bool {
    let cleaned: String = gap
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect();
    cleaned.split_whitespace().all(is_connector_word)
}

/// The input text with the matched temporal span excised.
///
/// Separator punctuation and dangling connector words are trimmed from the
/// cut edges; an empty remainder falls back to the full input.
fn derive_title(text: &str, span_start: usize, span_end: usize) -> String {
    let mut parts = Vec::new();
    for raw in [&text[..span_start], &text[span_end..]] {
        let cleaned = trim_connector_edges(raw);
        if !cleaned.is_empty() {
            parts.push(cleaned);
        }
    }

    let title = parts.join(" ");
    if title.is_empty() {
        text.trim().to_string()
    } else {
        title
    }
}

fn trim_connector_edges(part: &str) -> String {
    let trimmed = part.trim_matches(|c: char| !c.is_alphanumeric());
    let words: Vec<&str> = trimmed.split_whitespace().collect();

    let mut start = 0;
    let mut end = words.len();
    while start < end && is_connector_word(&words[start].to_ascii_lowercase()) {
        start += 1;
    }
    while end > start && is_connector_word(&words[end - 1].to_ascii_lowercase()) {
        end -= 1;
    }

    words[start..end].join(" ")
}

#[cfg(test)]
mod tests {
    //! Unit tests for temporal clustering and title derivation.
    use chrono::{TimeZone, Utc};

    use super::*;

    fn query(text: &str) -> TimeQuery {
        TimeQuery::new(text, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_title_strips_temporal_span_and_separators() {
        let parsed = parse(&query("block 2-4pm tomorrow — Deep Work thesis")).unwrap();
        assert!(parsed.title.contains("Deep Work thesis"));
        assert!(!parsed.title.contains("2-4pm"));
        assert!(!parsed.title.contains("tomorrow"));
    }

    #[test]
    fn test_title_falls_back_to_full_text() {
        let parsed = parse(&query("tomorrow")).unwrap();
        assert_eq!(parsed.title, "tomorrow");
    }

    #[test]
    fn test_title_drops_dangling_connector() {
        let parsed = parse(&query("lunch at 2pm")).unwrap();
        assert_eq!(parsed.title, "lunch");
    }

    #[test]
    fn test_first_match_rule_ignores_later_expressions() {
        // "tomorrow" anchors the candidate; "friday 7pm" is a second
        // expression past a non-connector word and must be ignored
        let parsed = parse(&query("lunch tomorrow or dinner friday 7pm")).unwrap();
        assert!(parsed.all_day);
        assert_eq!(
            parsed.start,
            Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_no_temporal_expression_is_none() {
        assert!(parse(&query("buy milk and eggs")).is_none());
        assert!(parse(&query("")).is_none());
    }

    #[test]
    fn test_zone_only_text_is_none() {
        assert!(parse(&query("Europe/Madrid")).is_none());
    }
}
