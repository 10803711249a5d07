use crate::shared::core::duration::nanos;
use chrono::{DateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryType {
    #[default]
    Work,
    Sick,
    SickChild,
    Vacation,
}

impl EntryType {
    pub const ALL: [EntryType; 4] = [
        EntryType::Work,
        EntryType::Sick,
        EntryType::SickChild,
        EntryType::Vacation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntryType::Work => "work",
            EntryType::Sick => "sick",
            EntryType::SickChild => "sick-child",
            EntryType::Vacation => "vacation",
        }
    }

    /// Work is tracked to the minute; every other type covers whole days.
    pub fn is_work(self) -> bool {
        self == EntryType::Work
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown entry type \"{0}\" (expected one of work, sick, sick-child, vacation)")]
pub struct UnknownEntryType(pub String);

impl FromStr for EntryType {
    type Err = UnknownEntryType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        EntryType::ALL
            .into_iter()
            .find(|entry_type| entry_type.as_str() == value)
            .ok_or_else(|| UnknownEntryType(value.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeEntryRejection {
    #[error("already started entry {id} (started {start}) - close it first")]
    AlreadyStarted { id: String, start: String },

    #[error("did not find any open time entry to close")]
    NothingToStop,

    #[error("end {end} is before start {start}")]
    EndBeforeStart { start: String, end: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: String,
    pub project_id: String,
    pub user_id: String,
    pub entry_type: EntryType,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    #[serde(with = "nanos")]
    pub breaks: TimeDelta,
    pub comment: String,
}

impl TimeEntry {
    /// Started but not yet stopped.
    pub fn is_open(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        elapsed(self.start, self.end, self.breaks, now)
    }

    pub fn cmp_by_start(&self, other: &TimeEntry) -> Ordering {
        cmp_starts(self.start.as_ref(), other.start.as_ref())
    }

    pub fn ensure_valid_interval(&self) -> Result<(), TimeEntryRejection> {
        match (self.start, self.end) {
            (Some(start), Some(end)) if end < start => Err(TimeEntryRejection::EndBeforeStart {
                start: start.to_rfc3339(),
                end: end.to_rfc3339(),
            }),
            _ => Ok(()),
        }
    }
}

/// `(end ?? now) - (start ?? now) - breaks`
pub fn elapsed(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    breaks: TimeDelta,
    now: DateTime<Utc>,
) -> TimeDelta {
    end.unwrap_or(now) - start.unwrap_or(now) - breaks
}

/// Whole days covered by a non-work entry: the elapsed span rounded to days, plus one.
pub fn day_count(elapsed: TimeDelta) -> i64 {
    let seconds = elapsed.num_seconds();
    let half_day = SECONDS_PER_DAY / 2;
    let days = if seconds >= 0 {
        (seconds + half_day) / SECONDS_PER_DAY
    } else {
        (seconds - half_day) / SECONDS_PER_DAY
    };
    days + 1
}

/// Entries without a start sort after every entry that has one.
pub fn cmp_starts(left: Option<&DateTime<Utc>>, right: Option<&DateTime<Utc>>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn sort_by_start(entries: &mut [TimeEntry]) {
    entries.sort_by(TimeEntry::cmp_by_start);
}

/// The most recently listed open entry, if any.
pub fn find_open_entry(entries: &[TimeEntry]) -> Option<&TimeEntry> {
    entries.iter().rev().find(|entry| entry.is_open())
}

pub fn ensure_nothing_open(entries: &[TimeEntry]) -> Result<(), TimeEntryRejection> {
    match find_open_entry(entries) {
        Some(open) => Err(TimeEntryRejection::AlreadyStarted {
            id: open.id.clone(),
            start: open.start.map(|start| start.to_rfc3339()).unwrap_or_default(),
        }),
        None => Ok(()),
    }
}

/// Midnight at the start of the same calendar day in the instant's own zone.
pub fn start_of_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> DateTime<Tz> {
    let midnight = instant.date_naive().and_time(NaiveTime::MIN);
    instant
        .timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .unwrap_or_else(|| instant.clone())
}

#[cfg(test)]
mod time_entries_time_entry_tests {
    use super::*;
    use crate::tests::fixtures::entries::TimeEntryBuilder;
    use chrono::FixedOffset;
    use rstest::rstest;

    fn utc(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, hour, minute, 0).unwrap()
    }

    #[rstest]
    fn work_from_nine_to_half_past_five_with_half_hour_break_is_eight_hours() {
        let entry = TimeEntryBuilder::new()
            .start(utc(9, 0))
            .end(utc(17, 30))
            .breaks(TimeDelta::minutes(30))
            .build();

        assert_eq!(entry.elapsed(utc(23, 0)), TimeDelta::hours(8));
    }

    #[rstest]
    fn open_entries_measure_up_to_now() {
        let entry = TimeEntryBuilder::new()
            .start(utc(9, 0))
            .open()
            .breaks(TimeDelta::minutes(30))
            .build();

        assert!(entry.is_open());
        assert_eq!(entry.elapsed(utc(10, 15)), TimeDelta::minutes(45));
    }

    #[rstest]
    fn entries_without_a_start_are_not_open() {
        let entry = TimeEntryBuilder::new().no_start().open().build();
        assert!(!entry.is_open());
    }

    #[rstest]
    #[case(TimeDelta::zero(), 1)]
    #[case(TimeDelta::hours(11), 1)]
    #[case(TimeDelta::hours(12), 2)]
    #[case(TimeDelta::days(4), 5)]
    fn day_count_rounds_to_whole_days_and_includes_the_first(
        #[case] elapsed: TimeDelta,
        #[case] expected: i64,
    ) {
        assert_eq!(day_count(elapsed), expected);
    }

    #[rstest]
    fn entries_sort_by_start_with_missing_starts_last() {
        let mut entries = vec![
            TimeEntryBuilder::new().id("no-start").no_start().build(),
            TimeEntryBuilder::new().id("late").start(utc(15, 0)).build(),
            TimeEntryBuilder::new().id("early").start(utc(8, 0)).build(),
        ];

        sort_by_start(&mut entries);

        let ids: Vec<_> = entries.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, ["early", "late", "no-start"]);
    }

    #[rstest]
    fn ensure_nothing_open_rejects_when_an_entry_is_running() {
        let entries = vec![
            TimeEntryBuilder::new().id("closed").build(),
            TimeEntryBuilder::new().id("running").start(utc(9, 0)).open().build(),
        ];

        assert_eq!(
            ensure_nothing_open(&entries),
            Err(TimeEntryRejection::AlreadyStarted {
                id: "running".into(),
                start: utc(9, 0).to_rfc3339(),
            })
        );
        assert_eq!(ensure_nothing_open(&entries[..1]), Ok(()));
    }

    #[rstest]
    fn intervals_ending_before_they_start_are_rejected() {
        let entry = TimeEntryBuilder::new().start(utc(10, 0)).end(utc(9, 0)).build();
        assert!(matches!(
            entry.ensure_valid_interval(),
            Err(TimeEntryRejection::EndBeforeStart { .. })
        ));
    }

    #[rstest]
    #[case("work", EntryType::Work)]
    #[case("sick", EntryType::Sick)]
    #[case("sick-child", EntryType::SickChild)]
    #[case("vacation", EntryType::Vacation)]
    fn entry_types_parse_from_their_wire_names(#[case] name: &str, #[case] expected: EntryType) {
        assert_eq!(name.parse::<EntryType>(), Ok(expected));
        assert_eq!(expected.to_string(), name);
        assert_eq!(
            serde_json::to_string(&expected).unwrap(),
            format!("\"{name}\"")
        );
    }

    #[rstest]
    fn unknown_entry_types_are_rejected() {
        assert!("holiday".parse::<EntryType>().is_err());
    }

    #[rstest]
    fn start_of_day_keeps_the_zone() {
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        let instant = zone.with_ymd_and_hms(2024, 3, 4, 0, 30, 0).unwrap();

        let midnight = start_of_day(&instant);

        assert_eq!(midnight, zone.with_ymd_and_hms(2024, 3, 4, 0, 0, 0).unwrap());
    }
}
