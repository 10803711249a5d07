use crate::modules::projects::use_cases::get_project::handler::require_project;
use crate::modules::time_entries::core::time_entry::{EntryType, TimeEntry, ensure_nothing_open};
use crate::shared::core::application_error::ApplicationError;
use crate::shared::infrastructure::repository::TimelapseRepository;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTimeEntry {
    pub entry_type: EntryType,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub breaks: TimeDelta,
    pub comment: String,
}

pub struct AddTimeEntryHandler {
    repository: Arc<dyn TimelapseRepository>,
}

impl AddTimeEntryHandler {
    pub fn new(repository: Arc<dyn TimelapseRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        user_id: &str,
        project_name: &str,
        command: AddTimeEntry,
    ) -> Result<TimeEntry, ApplicationError> {
        let project = require_project(self.repository.as_ref(), user_id, project_name).await?;
        let entry = TimeEntry {
            id: String::new(),
            project_id: project.id,
            user_id: user_id.to_string(),
            entry_type: command.entry_type,
            start: command.start,
            end: command.end,
            breaks: command.breaks,
            comment: command.comment,
        };
        entry.ensure_valid_interval()?;
        if entry.is_open() {
            let existing = self.repository.list_time_entries(&entry.project_id).await?;
            ensure_nothing_open(&existing)?;
        }

        let stored = self.repository.add_time_entry(entry).await?;
        info!(entry_id = %stored.id, project = %project_name, "Time entry added");
        Ok(stored)
    }
}
