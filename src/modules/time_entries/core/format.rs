// Fixed-width, human readable rendering of time entries.
//
// Column widths do not depend on the entry type so that listings line up:
// instants take 16 columns, breaks 9, durations 8.

use crate::modules::time_entries::core::time_entry::{EntryType, day_count, elapsed};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::fmt;

const BLANK_INSTANT: &str = "                ";
const BLANK_BREAKS: &str = "         ";

/// Minutes in `duration`, rounding a remainder of 30 seconds or more up.
fn rounded_minutes(duration: TimeDelta) -> i64 {
    let seconds = duration.num_seconds();
    if seconds >= 0 {
        (seconds + 30) / 60
    } else {
        (seconds - 30) / 60
    }
}

pub fn format_entry_time<Tz: TimeZone>(
    entry_type: EntryType,
    instant: Option<&DateTime<Utc>>,
    zone: &Tz,
) -> String
where
    Tz::Offset: fmt::Display,
{
    match instant {
        None => BLANK_INSTANT.to_string(),
        Some(instant) if entry_type.is_work() => instant
            .with_timezone(zone)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        Some(instant) => {
            let day = instant.with_timezone(zone).format("%Y-%m-%d").to_string();
            format!("{day:<16}")
        }
    }
}

pub fn format_entry_breaks(entry_type: EntryType, breaks: TimeDelta) -> String {
    if !entry_type.is_work() || breaks <= TimeDelta::zero() {
        return BLANK_BREAKS.to_string();
    }
    let minutes = rounded_minutes(breaks);
    format!("(-{:02}h{:02}m)", minutes / 60, minutes % 60)
}

pub fn format_entry_duration(entry_type: EntryType, elapsed: TimeDelta) -> String {
    if !entry_type.is_work() {
        return format!("{:02}d     ", day_count(elapsed));
    }
    let minutes = rounded_minutes(elapsed);
    if minutes.abs() < 24 * 60 {
        format!("  {:02}h{:02}m", minutes / 60, (minutes % 60).abs())
    } else {
        format!("{:02}d{:02}h  ", minutes / (24 * 60), (minutes % (24 * 60) / 60).abs())
    }
}

/// One listing line:
/// `<id> <start> - <end> <breaks> (<duration>): <project> <type> <comment>`.
pub struct EntryLine<'a, Tz: TimeZone> {
    pub id: &'a str,
    pub project_name: &'a str,
    pub entry_type: EntryType,
    pub start: Option<&'a DateTime<Utc>>,
    pub end: Option<&'a DateTime<Utc>>,
    pub breaks: TimeDelta,
    pub comment: &'a str,
    pub now: DateTime<Utc>,
    pub zone: Tz,
}

impl<Tz: TimeZone> fmt::Display for EntryLine<'_, Tz>
where
    Tz::Offset: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let elapsed = elapsed(
            self.start.copied(),
            self.end.copied(),
            self.breaks,
            self.now,
        );
        write!(
            f,
            "{} {} - {} {} ({}): {} {} {}",
            self.id,
            format_entry_time(self.entry_type, self.start, &self.zone),
            format_entry_time(self.entry_type, self.end, &self.zone),
            format_entry_breaks(self.entry_type, self.breaks),
            format_entry_duration(self.entry_type, elapsed),
            self.project_name,
            self.entry_type,
            self.comment,
        )
    }
}
