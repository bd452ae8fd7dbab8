use std::sync::Once;

use chrono::{Duration, TimeZone, Utc};
use feedcheck_core::{
    normalize, parse_relative, Instant, LabelDefect, MalformedLabel, RelativeAge, TimeUnit,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(feedcheck_logging::initialize_for_tests);
}

fn reference() -> Instant {
    Utc.with_ymd_and_hms(2024, 5, 15, 8, 0, 0).unwrap()
}

#[test]
fn fixed_duration_units_subtract_from_reference() {
    init_logging();
    let t = reference();
    assert_eq!(normalize("5 minutes", t).unwrap(), t - Duration::minutes(5));
    assert_eq!(normalize("1 minute", t).unwrap(), t - Duration::minutes(1));
    assert_eq!(normalize("3 hours", t).unwrap(), t - Duration::hours(3));
    assert_eq!(normalize("1 hour", t).unwrap(), t - Duration::hours(1));
    assert_eq!(normalize("2 days", t).unwrap(), t - Duration::days(2));
}

#[test]
fn calendar_units_move_month_and_year_fields() {
    init_logging();
    let t = reference();
    assert_eq!(
        normalize("2 months", t).unwrap(),
        Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap()
    );
    assert_eq!(
        normalize("7 months", t).unwrap(),
        Utc.with_ymd_and_hms(2023, 10, 15, 8, 0, 0).unwrap()
    );
    assert_eq!(
        normalize("1 year", t).unwrap(),
        Utc.with_ymd_and_hms(2023, 5, 15, 8, 0, 0).unwrap()
    );
}

#[test]
fn month_end_overflows_into_next_month() {
    init_logging();
    let end_of_march = Utc.with_ymd_and_hms(2023, 3, 31, 10, 0, 0).unwrap();
    assert_eq!(
        normalize("1 month", end_of_march).unwrap(),
        Utc.with_ymd_and_hms(2023, 3, 3, 10, 0, 0).unwrap()
    );

    let leap_day = Utc.with_ymd_and_hms(2024, 2, 29, 10, 0, 0).unwrap();
    assert_eq!(
        normalize("1 year", leap_day).unwrap(),
        Utc.with_ymd_and_hms(2023, 3, 1, 10, 0, 0).unwrap()
    );
}

#[test]
fn zero_amount_returns_reference_for_every_unit() {
    init_logging();
    let t = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
    for unit in ["minutes", "hours", "days", "months", "years", "fortnights"] {
        assert_eq!(normalize(&format!("0 {unit}"), t).unwrap(), t, "{unit}");
    }
}

#[test]
fn fixed_units_are_strictly_monotonic_in_amount() {
    init_logging();
    let t = reference();
    for unit in ["minutes", "hours", "days"] {
        let mut last = normalize(&format!("0 {unit}"), t).unwrap();
        for amount in 1..50 {
            let next = normalize(&format!("{amount} {unit}"), t).unwrap();
            assert!(next < last, "{amount} {unit}");
            last = next;
        }
    }
}

#[test]
fn unrecognized_unit_falls_back_to_reference() {
    init_logging();
    let t = reference();
    assert_eq!(normalize("40 seconds", t).unwrap(), t);
    assert_eq!(
        parse_relative("40 seconds").unwrap(),
        RelativeAge {
            amount: 40,
            unit: TimeUnit::Unrecognized("seconds".to_string()),
        }
    );
}

#[test]
fn trailing_words_are_ignored() {
    init_logging();
    let t = reference();
    assert_eq!(normalize("3 hours ago", t).unwrap(), t - Duration::hours(3));
}

#[test]
fn malformed_labels_are_reported() {
    init_logging();
    let t = reference();
    let cases = [
        ("", LabelDefect::Empty),
        ("   ", LabelDefect::Empty),
        ("12", LabelDefect::MissingUnit),
        ("few hours", LabelDefect::NonNumericAmount),
        ("1.5 hours", LabelDefect::NonNumericAmount),
        ("-2 days", LabelDefect::NegativeAmount),
        ("99999999999 days", LabelDefect::AmountOutOfRange),
    ];
    for (label, defect) in cases {
        assert_eq!(
            normalize(label, t).unwrap_err(),
            MalformedLabel {
                label: label.to_string(),
                defect,
            },
            "{label:?}"
        );
    }
}

#[test]
fn repeated_calls_do_not_disturb_reference() {
    init_logging();
    let t = reference();
    let first = normalize("2 months", t).unwrap();
    let _ = normalize("3 years", t).unwrap();
    let again = normalize("2 months", t).unwrap();
    assert_eq!(first, again);
    assert_eq!(t, reference());
}
