use crate::modules::time_entries::core::time_entry::{EntryType, TimeEntry};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};

/// A closed work entry on 2024-03-04, 09:00 to 17:30 UTC with a 30 minute
/// break.
pub struct TimeEntryBuilder {
    inner: TimeEntry,
}

impl Default for TimeEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TimeEntryBuilder {
    pub fn new() -> Self {
        Self {
            inner: TimeEntry {
                id: "te-0001".to_string(),
                project_id: "p-0001".to_string(),
                user_id: "u-0001".to_string(),
                entry_type: EntryType::Work,
                start: Some(Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()),
                end: Some(Utc.with_ymd_and_hms(2024, 3, 4, 17, 30, 0).unwrap()),
                breaks: TimeDelta::minutes(30),
                comment: String::new(),
            },
        }
    }

    pub fn id(mut self, v: impl Into<String>) -> Self {
        self.inner.id = v.into();
        self
    }

    pub fn project_id(mut self, v: impl Into<String>) -> Self {
        self.inner.project_id = v.into();
        self
    }

    pub fn user_id(mut self, v: impl Into<String>) -> Self {
        self.inner.user_id = v.into();
        self
    }

    pub fn entry_type(mut self, v: EntryType) -> Self {
        self.inner.entry_type = v;
        self
    }

    pub fn start(mut self, v: DateTime<Utc>) -> Self {
        self.inner.start = Some(v);
        self
    }

    pub fn no_start(mut self) -> Self {
        self.inner.start = None;
        self
    }

    pub fn end(mut self, v: DateTime<Utc>) -> Self {
        self.inner.end = Some(v);
        self
    }

    pub fn open(mut self) -> Self {
        self.inner.end = None;
        self
    }

    pub fn breaks(mut self, v: TimeDelta) -> Self {
        self.inner.breaks = v;
        self
    }

    pub fn comment(mut self, v: impl Into<String>) -> Self {
        self.inner.comment = v.into();
        self
    }

    pub fn build(self) -> TimeEntry {
        self.inner
    }
}
