use crate::modules::projects::use_cases::get_project::handler::require_project;
use crate::modules::time_entries::core::time_entry::{
    TimeEntry, TimeEntryRejection, find_open_entry,
};
use crate::shared::core::application_error::ApplicationError;
use crate::shared::infrastructure::repository::TimelapseRepository;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopTimeEntry {
    /// Defaults to `now`.
    pub end: Option<DateTime<Utc>>,
    /// Replaces the recorded breaks when given.
    pub breaks: Option<TimeDelta>,
}

pub struct StopTimeEntryHandler {
    repository: Arc<dyn TimelapseRepository>,
}

impl StopTimeEntryHandler {
    pub fn new(repository: Arc<dyn TimelapseRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        user_id: &str,
        project_name: &str,
        command: StopTimeEntry,
        now: DateTime<Utc>,
    ) -> Result<TimeEntry, ApplicationError> {
        let project = require_project(self.repository.as_ref(), user_id, project_name).await?;
        let existing = self.repository.list_time_entries(&project.id).await?;
        let mut entry = find_open_entry(&existing)
            .cloned()
            .ok_or(TimeEntryRejection::NothingToStop)?;

        entry.end = Some(command.end.unwrap_or(now));
        if let Some(breaks) = command.breaks {
            entry.breaks = breaks;
        }
        entry.ensure_valid_interval()?;

        let stopped = self.repository.update_time_entry(&entry).await?;
        info!(entry_id = %stopped.id, project = %project_name, "Time entry stopped");
        Ok(stopped)
    }
}
