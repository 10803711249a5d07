use crate::modules::time_entries::core::format::EntryLine;
use crate::modules::time_entries::core::time_entry::{EntryType, TimeEntry, elapsed};
use crate::shared::core::duration::nanos;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire shape of a time entry. `breaks` travels as nanoseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntryResource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub project_name: String,
    #[serde(rename = "type", default)]
    pub entry_type: EntryType,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(with = "nanos", default = "TimeDelta::zero")]
    pub breaks: TimeDelta,
    #[serde(default)]
    pub comment: String,
}

impl TimeEntryResource {
    pub fn from_entry(entry: &TimeEntry, project_name: &str) -> Self {
        Self {
            id: entry.id.clone(),
            project_name: project_name.to_string(),
            entry_type: entry.entry_type,
            start: entry.start,
            end: entry.end,
            breaks: entry.breaks,
            comment: entry.comment.clone(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.start.is_some() && self.end.is_none()
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> TimeDelta {
        elapsed(self.start, self.end, self.breaks, now)
    }

    pub fn line<Tz: TimeZone>(&self, now: DateTime<Utc>, zone: Tz) -> EntryLine<'_, Tz> {
        EntryLine {
            id: &self.id,
            project_name: &self.project_name,
            entry_type: self.entry_type,
            start: self.start.as_ref(),
            end: self.end.as_ref(),
            breaks: self.breaks,
            comment: &self.comment,
            now,
            zone,
        }
    }
}

impl fmt::Display for TimeEntryResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.line(Utc::now(), Local), f)
    }
}

/// Body of `POST /projects/{name}/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    #[serde(rename = "type", default)]
    pub entry_type: EntryType,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(with = "nanos", default = "TimeDelta::zero")]
    pub breaks: TimeDelta,
    #[serde(default)]
    pub comment: String,
}

/// Body of `POST /projects/{name}/stop`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRequest {
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "optional_nanos")]
    pub breaks: Option<TimeDelta>,
}

mod optional_nanos {
    use chrono::TimeDelta;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<TimeDelta>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => crate::shared::core::duration::nanos::serialize(value, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<TimeDelta>, D::Error> {
        Ok(Option::<i64>::deserialize(deserializer)?.map(TimeDelta::nanoseconds))
    }
}
