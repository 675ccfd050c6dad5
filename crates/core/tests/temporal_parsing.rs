//! Integration tests for the temporal expression parser.
//!
//! Reference instant for most cases: Monday 2024-01-01T00:00:00 in the
//! query's zone.

use chrono::{TimeZone, Utc};
use chrono_tz::America::New_York;
use chrono_tz::Europe::Madrid;
use quickslot_core::temporal::parse;
use quickslot_domain::TimeQuery;

const ZONE: &str = "America/New_York";

fn ny_query(text: &str) -> TimeQuery {
    let reference = New_York.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().with_timezone(&Utc);
    TimeQuery::new(text, reference).with_timezone_hint(ZONE)
}

fn utc_query(text: &str) -> TimeQuery {
    TimeQuery::new(text, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
}

#[test]
fn test_timed_range_tomorrow() {
    let parsed = parse(&ny_query("block 2-4pm tomorrow — Deep Work thesis")).unwrap();

    assert!(!parsed.all_day);
    assert_eq!(parsed.timezone, ZONE);
    assert_eq!(
        parsed.start,
        New_York.with_ymd_and_hms(2024, 1, 2, 14, 0, 0).unwrap().with_timezone(&Utc)
    );
    assert_eq!(
        parsed.end,
        New_York.with_ymd_and_hms(2024, 1, 2, 16, 0, 0).unwrap().with_timezone(&Utc)
    );
    assert!(parsed.title.contains("Deep Work thesis"));
}

#[test]
fn test_all_day_tomorrow() {
    let parsed = parse(&ny_query("all day tomorrow: study retreat")).unwrap();

    assert!(parsed.all_day);
    // Inclusive start date 2024-01-02, exclusive end date 2024-01-03
    assert_eq!(
        parsed.start,
        New_York.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap().with_timezone(&Utc)
    );
    assert_eq!(
        parsed.end,
        New_York.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap().with_timezone(&Utc)
    );
    assert!(parsed.title.contains("study retreat"));
}

#[test]
fn test_no_temporal_expression_returns_none() {
    for text in ["buy milk and eggs", "summarize my resume", "", "the meeting notes"] {
        assert!(parse(&ny_query(text)).is_none(), "expected no match for {text:?}");
    }
}

#[test]
fn test_start_only_gets_default_duration() {
    let parsed = parse(&ny_query("call with advisor 2:30pm tomorrow")).unwrap();

    assert_eq!(
        parsed.start,
        New_York.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap().with_timezone(&Utc)
    );
    assert_eq!(
        parsed.end,
        New_York.with_ymd_and_hms(2024, 1, 2, 15, 30, 0).unwrap().with_timezone(&Utc)
    );
}

#[test]
fn test_explicit_offset_beats_timezone_hint() {
    let parsed = parse(&ny_query("2pm tomorrow UTC+2")).unwrap();

    assert_eq!(parsed.timezone, "UTC+02:00");
    // 14:00 at +02:00 on Jan 2 is 12:00Z
    assert_eq!(parsed.start, Utc.with_ymd_and_hms(2024, 1, 2, 12, 0, 0).unwrap());
}

#[test]
fn test_iana_zone_in_text_beats_timezone_hint() {
    let parsed = parse(&ny_query("9am Europe/Madrid tomorrow")).unwrap();

    assert_eq!(parsed.timezone, "Europe/Madrid");
    assert_eq!(
        parsed.start,
        Madrid.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap().with_timezone(&Utc)
    );
}

#[test]
fn test_utc_fallback_without_hint_or_zone() {
    let parsed = parse(&utc_query("2pm tomorrow")).unwrap();

    assert_eq!(parsed.timezone, "UTC");
    assert_eq!(parsed.start, Utc.with_ymd_and_hms(2024, 1, 2, 14, 0, 0).unwrap());
}

#[test]
fn test_24h_clock_range() {
    let parsed = parse(&utc_query("workshop 14:00-16:30 tomorrow")).unwrap();

    assert_eq!(parsed.start, Utc.with_ymd_and_hms(2024, 1, 2, 14, 0, 0).unwrap());
    assert_eq!(parsed.end, Utc.with_ymd_and_hms(2024, 1, 2, 16, 30, 0).unwrap());
    assert_eq!(parsed.title, "workshop");
}

#[test]
fn test_overnight_range_crosses_midnight() {
    let parsed = parse(&utc_query("11pm-1am tomorrow")).unwrap();

    assert_eq!(parsed.start, Utc.with_ymd_and_hms(2024, 1, 2, 23, 0, 0).unwrap());
    assert_eq!(parsed.end, Utc.with_ymd_and_hms(2024, 1, 3, 1, 0, 0).unwrap());
}

#[test]
fn test_weekday_resolution() {
    // Reference is Monday 2024-01-01
    let parsed = parse(&utc_query("wednesday 2:30pm review")).unwrap();
    assert_eq!(parsed.start, Utc.with_ymd_and_hms(2024, 1, 3, 14, 30, 0).unwrap());

    // "next monday" from a Monday is a week out
    let parsed = parse(&utc_query("next monday 9am standup")).unwrap();
    assert_eq!(parsed.start, Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap());
}

#[test]
fn test_iso_date_with_time() {
    let parsed = parse(&utc_query("review 2024-03-15 14:00")).unwrap();

    assert!(!parsed.all_day);
    assert_eq!(parsed.start, Utc.with_ymd_and_hms(2024, 3, 15, 14, 0, 0).unwrap());
    assert_eq!(parsed.title, "review");
}

#[test]
fn test_bare_date_is_all_day() {
    let parsed = parse(&utc_query("retreat 5 feb")).unwrap();

    assert!(parsed.all_day);
    assert_eq!(parsed.start, Utc.with_ymd_and_hms(2024, 2, 5, 0, 0, 0).unwrap());
    assert_eq!(parsed.end, Utc.with_ymd_and_hms(2024, 2, 6, 0, 0, 0).unwrap());
    assert_eq!(parsed.title, "retreat");
}

#[test]
fn test_all_day_date_range_has_exclusive_end() {
    let parsed = parse(&utc_query("offsite Jan 5-7")).unwrap();

    assert!(parsed.all_day);
    assert_eq!(parsed.start, Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap());
    // Last included day is Jan 7; the exclusive end is Jan 8
    assert_eq!(parsed.end, Utc.with_ymd_and_hms(2024, 1, 8, 0, 0, 0).unwrap());
}

#[test]
fn test_first_expression_wins() {
    let parsed = parse(&utc_query("lunch tomorrow or dinner friday 7pm")).unwrap();

    assert!(parsed.all_day);
    assert_eq!(parsed.start, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
}

#[test]
fn test_parse_is_deterministic() {
    let query = ny_query("block 2-4pm tomorrow — Deep Work thesis");
    assert_eq!(parse(&query), parse(&query));
}
