use crate::modules::projects::use_cases::get_project::handler::require_project;
use crate::modules::time_entries::core::time_entry::{EntryType, TimeEntry, ensure_nothing_open};
use crate::shared::core::application_error::ApplicationError;
use crate::shared::infrastructure::repository::TimelapseRepository;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use tracing::info;

/// Full replacement of an entry. An empty `id` means "the entry named in the path".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTimeEntry {
    pub id: String,
    pub entry_type: EntryType,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub breaks: TimeDelta,
    pub comment: String,
}

pub struct UpdateTimeEntryHandler {
    repository: Arc<dyn TimelapseRepository>,
}

impl UpdateTimeEntryHandler {
    pub fn new(repository: Arc<dyn TimelapseRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        user_id: &str,
        project_name: &str,
        entry_id: &str,
        command: UpdateTimeEntry,
    ) -> Result<TimeEntry, ApplicationError> {
        if !command.id.is_empty() && command.id != entry_id {
            return Err(ApplicationError::Validation(
                "entry ID in URL does not match entry ID in body".into(),
            ));
        }
        let project = require_project(self.repository.as_ref(), user_id, project_name).await?;
        let mut entry = self
            .repository
            .get_time_entry(&project.id, entry_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("Time entry not found: {project_name}/{entry_id}"))
            })?;

        entry.entry_type = command.entry_type;
        entry.start = command.start;
        entry.end = command.end;
        entry.breaks = command.breaks;
        entry.comment = command.comment;
        entry.ensure_valid_interval()?;
        if entry.is_open() {
            let others: Vec<TimeEntry> = self
                .repository
                .list_time_entries(&project.id)
                .await?
                .into_iter()
                .filter(|other| other.id != entry.id)
                .collect();
            ensure_nothing_open(&others)?;
        }

        let updated = self.repository.update_time_entry(&entry).await?;
        info!(entry_id = %updated.id, project = %project_name, "Time entry updated");
        Ok(updated)
    }
}
