//! Relative-time labels ("3 hours ago") resolved against a reference instant.

use std::fmt;

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc};
use feedcheck_logging::{check_trace, check_warn};
use thiserror::Error;

/// Absolute point in time. Millisecond differences are taken with
/// [`DateTime::signed_duration_since`].
pub type Instant = DateTime<Utc>;

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeUnit {
    Minute,
    Hour,
    Day,
    Month,
    Year,
    /// Unit word that is not understood; resolves to the reference instant.
    Unrecognized(String),
}

impl TimeUnit {
    fn from_word(word: &str) -> Self {
        match word {
            "minute" | "minutes" => TimeUnit::Minute,
            "hour" | "hours" => TimeUnit::Hour,
            "day" | "days" => TimeUnit::Day,
            "month" | "months" => TimeUnit::Month,
            "year" | "years" => TimeUnit::Year,
            other => TimeUnit::Unrecognized(other.to_string()),
        }
    }
}

/// Parsed form of a relative-time label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeAge {
    pub amount: u32,
    pub unit: TimeUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelDefect {
    Empty,
    MissingUnit,
    NonNumericAmount,
    NegativeAmount,
    AmountOutOfRange,
}

impl fmt::Display for LabelDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelDefect::Empty => write!(f, "label is empty"),
            LabelDefect::MissingUnit => write!(f, "missing time unit"),
            LabelDefect::NonNumericAmount => write!(f, "amount is not an integer"),
            LabelDefect::NegativeAmount => write!(f, "amount is negative"),
            LabelDefect::AmountOutOfRange => write!(f, "amount leaves the representable time range"),
        }
    }
}

/// A relative-time label that cannot be interpreted. Indicates corrupt
/// upstream data and is never recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed relative time label {label:?}: {defect}")]
pub struct MalformedLabel {
    pub label: String,
    pub defect: LabelDefect,
}

impl MalformedLabel {
    fn new(label: &str, defect: LabelDefect) -> Self {
        Self {
            label: label.to_string(),
            defect,
        }
    }
}

/// Splits `label` into amount and unit. Only the first two whitespace
/// separated words are read, so a trailing "ago" is accepted.
pub fn parse_relative(label: &str) -> Result<RelativeAge, MalformedLabel> {
    let mut words = label.split_whitespace();
    let amount = words
        .next()
        .ok_or_else(|| MalformedLabel::new(label, LabelDefect::Empty))?;
    let unit = words
        .next()
        .ok_or_else(|| MalformedLabel::new(label, LabelDefect::MissingUnit))?;

    let amount: i64 = amount
        .parse()
        .map_err(|_| MalformedLabel::new(label, LabelDefect::NonNumericAmount))?;
    if amount < 0 {
        return Err(MalformedLabel::new(label, LabelDefect::NegativeAmount));
    }
    let amount = u32::try_from(amount)
        .map_err(|_| MalformedLabel::new(label, LabelDefect::AmountOutOfRange))?;

    Ok(RelativeAge {
        amount,
        unit: TimeUnit::from_word(unit),
    })
}

impl RelativeAge {
    /// Resolves this age against `reference`, returning a new instant.
    ///
    /// Months and years use calendar arithmetic: the day of month is kept and
    /// overflows into the following month when the target month is shorter
    /// (31 March minus one month is 3 March, or 2 March in a leap year).
    pub fn resolve(&self, reference: Instant) -> Option<Instant> {
        let amount = i64::from(self.amount);
        match &self.unit {
            TimeUnit::Minute => subtract_ms(reference, amount * MINUTE_MS),
            TimeUnit::Hour => subtract_ms(reference, amount * HOUR_MS),
            TimeUnit::Day => subtract_ms(reference, amount * DAY_MS),
            TimeUnit::Month => shift_months(reference, amount),
            TimeUnit::Year => shift_months(reference, amount * 12),
            TimeUnit::Unrecognized(_) => Some(reference),
        }
    }
}

/// Converts a relative-time label into an absolute instant measured back from
/// `reference`. An unrecognized unit resolves to `reference` and is reported
/// as a warning.
pub fn normalize(label: &str, reference: Instant) -> Result<Instant, MalformedLabel> {
    let age = parse_relative(label)?;
    if let TimeUnit::Unrecognized(unit) = &age.unit {
        check_warn!("Unhandled time unit {:?} in label {:?}", unit, label);
    }
    let instant = age
        .resolve(reference)
        .ok_or_else(|| MalformedLabel::new(label, LabelDefect::AmountOutOfRange))?;
    check_trace!("Normalized {:?} to {}", label, instant.to_rfc3339());
    Ok(instant)
}

fn subtract_ms(reference: Instant, ms: i64) -> Option<Instant> {
    reference.checked_sub_signed(Duration::try_milliseconds(ms)?)
}

fn shift_months(reference: Instant, months: i64) -> Option<Instant> {
    let total = i64::from(reference.year()) * 12 + i64::from(reference.month0()) - months;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    let date = NaiveDate::from_ymd_opt(year, month, 1)?
        .checked_add_days(Days::new(u64::from(reference.day0())))?;
    Some(date.and_time(reference.time()).and_utc())
}
