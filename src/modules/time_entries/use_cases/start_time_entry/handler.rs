use crate::modules::projects::use_cases::get_project::handler::require_project;
use crate::modules::time_entries::core::time_entry::{EntryType, TimeEntry, ensure_nothing_open};
use crate::shared::core::application_error::ApplicationError;
use crate::shared::infrastructure::repository::TimelapseRepository;
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTimeEntry {
    pub entry_type: EntryType,
    /// Defaults to `now`.
    pub start: Option<DateTime<Utc>>,
    pub breaks: TimeDelta,
    pub comment: String,
}

pub struct StartTimeEntryHandler {
    repository: Arc<dyn TimelapseRepository>,
}

impl StartTimeEntryHandler {
    pub fn new(repository: Arc<dyn TimelapseRepository>) -> Self {
        Self { repository }
    }

    /// Opens a new entry unless the project already has one running.
    pub async fn handle(
        &self,
        user_id: &str,
        project_name: &str,
        command: StartTimeEntry,
        now: DateTime<Utc>,
    ) -> Result<TimeEntry, ApplicationError> {
        let project = require_project(self.repository.as_ref(), user_id, project_name).await?;
        let existing = self.repository.list_time_entries(&project.id).await?;
        ensure_nothing_open(&existing)?;

        let entry = TimeEntry {
            id: String::new(),
            project_id: project.id,
            user_id: user_id.to_string(),
            entry_type: command.entry_type,
            start: Some(command.start.unwrap_or(now)),
            end: None,
            breaks: command.breaks,
            comment: command.comment,
        };
        let stored = self.repository.add_time_entry(entry).await?;
        info!(entry_id = %stored.id, project = %project_name, "Time entry started");
        Ok(stored)
    }
}

#[cfg(test)]
mod start_time_entry_handler_tests {
    use super::*;
    use crate::modules::time_entries::core::time_entry::TimeEntryRejection;
    use crate::shared::infrastructure::repository::in_memory::InMemoryRepository;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 15, 0).unwrap()
    }

    #[fixture]
    fn command() -> StartTimeEntry {
        StartTimeEntry {
            entry_type: EntryType::Work,
            start: None,
            breaks: TimeDelta::zero(),
            comment: String::new(),
        }
    }

    async fn handler() -> (StartTimeEntryHandler, Arc<InMemoryRepository>) {
        let repository = Arc::new(InMemoryRepository::new());
        repository.add_project("u-1", "acme", "", true).await.unwrap();
        (StartTimeEntryHandler::new(repository.clone()), repository)
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_open_an_entry_starting_now(command: StartTimeEntry) {
        let (handler, _) = handler().await;

        let entry = handler.handle("u-1", "acme", command, now()).await.unwrap();

        assert!(entry.is_open());
        assert_eq!(entry.start, Some(now()));
    }

    #[rstest]
    #[tokio::test]
    async fn an_explicit_start_wins_over_now(command: StartTimeEntry) {
        let (handler, _) = handler().await;
        let earlier = now() - TimeDelta::hours(1);
        let command = StartTimeEntry {
            start: Some(earlier),
            ..command
        };

        let entry = handler.handle("u-1", "acme", command, now()).await.unwrap();

        assert_eq!(entry.start, Some(earlier));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_refuse_a_second_open_entry(command: StartTimeEntry) {
        let (handler, repository) = handler().await;
        let first = handler.handle("u-1", "acme", command.clone(), now()).await.unwrap();

        let error = handler.handle("u-1", "acme", command, now()).await.unwrap_err();

        assert!(matches!(
            error,
            ApplicationError::Domain(TimeEntryRejection::AlreadyStarted { ref id, .. }) if *id == first.id
        ));
        assert_eq!(
            repository
                .list_time_entries(&first.project_id)
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
