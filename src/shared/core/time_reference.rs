// Free-form time references resolved against a reference instant.
//
// Resolution order:
// 1. Offset-qualified timestamps (RFC 3339).
// 2. Local timestamps without a zone, interpreted in the reference's zone.
// 3. A relative grammar applied token by token to a running instant
//    ("yesterday at 13:24", "18th jun at 13:24", "3 seconds ago", "1h10m").

use crate::shared::core::duration::parse_duration;
use chrono::format::{Parsed, StrftimeItems, parse};
use chrono::{
    DateTime, Datelike, Days, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeDelta,
    TimeZone, Timelike,
};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M",
    "%d.%m %H:%M",
];

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static CLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+):([0-9]+)").expect("clock pattern"));
static DAY_OF_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)(\.|th|nd)").expect("day of month pattern"));
static AGO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+)\s+(second|minute|hour|day|week|month|year)s?\s+ago")
        .expect("relative offset pattern")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeReferenceError {
    #[error("empty time reference")]
    Empty,

    #[error("cannot parse time reference \"{input}\": unrecognized \"{remainder}\"")]
    Unrecognized { input: String, remainder: String },
}

/// Resolves `input` against `reference`; the result lives in the reference's zone.
pub fn parse_time_ref<Tz: TimeZone>(
    input: &str,
    reference: &DateTime<Tz>,
) -> Result<DateTime<Tz>, TimeReferenceError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TimeReferenceError::Empty);
    }

    if let Some(zoned) = parse_zoned(input, reference) {
        return Ok(zoned);
    }
    if let Some(local) = parse_local(input, reference) {
        return Ok(local);
    }
    parse_relative(input, reference)
}

fn parse_zoned<Tz: TimeZone>(input: &str, reference: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|parsed| parsed.with_timezone(&reference.timezone()))
}

fn parse_local<Tz: TimeZone>(input: &str, reference: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    LOCAL_FORMATS.iter().find_map(|format| {
        let mut parsed = Parsed::new();
        parse(&mut parsed, input, StrftimeItems::new(format)).ok()?;
        // Formats without a year take it from the reference; a parsed year is kept.
        let _ = parsed.set_year(i64::from(reference.year()));
        let naive = parsed.to_naive_datetime_with_offset(0).ok()?;
        in_zone(reference, naive)
    })
}

fn parse_relative<Tz: TimeZone>(
    input: &str,
    reference: &DateTime<Tz>,
) -> Result<DateTime<Tz>, TimeReferenceError> {
    let lowered = input.to_lowercase();
    let mut remainder = lowered.as_str();
    let mut current = reference.clone();

    loop {
        remainder = remainder.trim_start();
        if remainder.is_empty() {
            return Ok(current);
        }
        let Some((next, consumed)) = apply_token(remainder, &current) else {
            return Err(TimeReferenceError::Unrecognized {
                input: input.to_string(),
                remainder: remainder.to_string(),
            });
        };
        current = next;
        remainder = &remainder[consumed..];
    }
}

/// Applies the first matching rule to the head of `remainder`, returning the
/// new running instant and the number of bytes consumed.
fn apply_token<Tz: TimeZone>(
    remainder: &str,
    current: &DateTime<Tz>,
) -> Option<(DateTime<Tz>, usize)> {
    if remainder == "now" {
        return Some((current.clone(), remainder.len()));
    }

    let word = remainder
        .split(char::is_whitespace)
        .next()
        .unwrap_or(remainder);
    if let Some(next) = apply_word(word, current) {
        return Some((next, word.len()));
    }

    if let Some(captures) = CLOCK.captures(remainder) {
        let hour: u32 = captures[1].parse().ok()?;
        let minute: u32 = captures[2].parse().ok()?;
        if hour <= 23 && minute <= 60 {
            let naive = current.date_naive().and_hms_opt(hour, 0, 0)?
                + TimeDelta::minutes(i64::from(minute));
            return Some((in_zone(current, naive)?, captures[0].len()));
        }
    }

    if let Some(captures) = DAY_OF_MONTH.captures(remainder) {
        let day: u32 = captures[1].parse().ok()?;
        if (1..=31).contains(&day) {
            let next = with_calendar_date(current, current.year(), current.month(), day)?;
            return Some((next, captures[0].len()));
        }
    }

    if let Some(captures) = AGO.captures(remainder) {
        let amount: u32 = captures[1].parse().ok()?;
        let next = subtract(current, amount, &captures[2])?;
        return Some((next, captures[0].len()));
    }

    None
}

fn apply_word<Tz: TimeZone>(word: &str, current: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    // Plain numbers belong to the "N units ago" rule.
    if !word.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(duration) = parse_duration(word) {
            return current.clone().checked_add_signed(duration);
        }
    }

    match word {
        "yesterday" => current.clone().checked_sub_signed(TimeDelta::hours(24)),
        "tomorrow" => current.clone().checked_add_signed(TimeDelta::hours(24)),
        "at" => Some(current.clone()),
        _ => {
            let month = month_by_prefix(word)?;
            with_calendar_date(current, current.year(), month, current.day())
        }
    }
}

/// Returns the 1-based month uniquely identified by a prefix of at least three letters.
fn month_by_prefix(word: &str) -> Option<u32> {
    if word.len() < 3 {
        return None;
    }
    let mut matches = MONTHS
        .iter()
        .enumerate()
        .filter(|(_, name)| name.starts_with(word));
    match (matches.next(), matches.next()) {
        (Some((index, _)), None) => u32::try_from(index + 1).ok(),
        _ => None,
    }
}

fn subtract<Tz: TimeZone>(current: &DateTime<Tz>, amount: u32, unit: &str) -> Option<DateTime<Tz>> {
    let current = current.clone();
    match unit {
        "second" => current.checked_sub_signed(TimeDelta::seconds(i64::from(amount))),
        "minute" => current.checked_sub_signed(TimeDelta::minutes(i64::from(amount))),
        "hour" => current.checked_sub_signed(TimeDelta::hours(i64::from(amount))),
        "day" => current.checked_sub_days(Days::new(u64::from(amount))),
        "week" => current.checked_sub_days(Days::new(u64::from(amount) * 7)),
        "month" => months_back(&current, i64::from(amount)),
        "year" => months_back(&current, i64::from(amount) * 12),
        _ => None,
    }
}

/// Same day of month `months` earlier; a day the target month lacks rolls over
/// into the following month (31 Mar minus one month is 3 Mar).
fn months_back<Tz: TimeZone>(current: &DateTime<Tz>, months: i64) -> Option<DateTime<Tz>> {
    let index = i64::from(current.year()) * 12 + i64::from(current.month0()) - months;
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    with_calendar_date(current, year, month, current.day())
}

/// Moves `current` to the given year, month and day while keeping its time of
/// day. Days past the end of the month roll over into the next month.
fn with_calendar_date<Tz: TimeZone>(
    current: &DateTime<Tz>,
    year: i32,
    month: u32,
    day: u32,
) -> Option<DateTime<Tz>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let date = first.checked_add_days(Days::new(u64::from(day.checked_sub(1)?)))?;
    let time = NaiveTime::from_hms_nano_opt(
        current.hour(),
        current.minute(),
        current.second(),
        current.nanosecond(),
    )?;
    in_zone(current, date.and_time(time))
}

fn in_zone<Tz: TimeZone>(reference: &DateTime<Tz>, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    let zone = reference.timezone();
    match zone.from_local_datetime(&naive) {
        LocalResult::Single(instant) => Some(instant),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        // Wall clock skipped by a forward transition: read it with the offset in
        // force a day earlier, which lands past the gap.
        LocalResult::None => {
            let before = zone
                .from_local_datetime(&naive.checked_sub_signed(TimeDelta::days(1))?)
                .earliest()?;
            let offset = TimeDelta::seconds(i64::from(before.offset().fix().local_minus_utc()));
            Some(zone.from_utc_datetime(&naive.checked_sub_signed(offset)?))
        }
    }
}
