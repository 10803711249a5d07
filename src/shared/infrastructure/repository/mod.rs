// Persistence port for users, projects and time entries.
//
// Every lookup below a user is scoped by the owning identifiers, so a caller
// can never reach another user's projects or entries.

pub mod in_memory;
pub mod json_file;

use crate::modules::identity::core::user::{Identity, User};
use crate::modules::projects::core::project::Project;
use crate::modules::time_entries::core::time_entry::TimeEntry;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("repository backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait TimelapseRepository: Send + Sync {
    /// Resolves the user owning `identity`, creating one on first sight and
    /// correcting a changed email in place.
    async fn find_or_create_user(&self, identity: &Identity) -> Result<User, RepositoryError>;

    async fn add_project(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        billable: bool,
    ) -> Result<Project, RepositoryError>;

    async fn get_project(&self, user_id: &str, name: &str)
    -> Result<Option<Project>, RepositoryError>;

    async fn list_projects(&self, user_id: &str) -> Result<Vec<Project>, RepositoryError>;

    /// Replaces the stored project with the same id.
    async fn update_project(&self, project: &Project) -> Result<Project, RepositoryError>;

    /// Stores `entry` under a freshly assigned id, ignoring `entry.id`.
    async fn add_time_entry(&self, entry: TimeEntry) -> Result<TimeEntry, RepositoryError>;

    async fn get_time_entry(
        &self,
        project_id: &str,
        entry_id: &str,
    ) -> Result<Option<TimeEntry>, RepositoryError>;

    async fn list_time_entries(&self, project_id: &str) -> Result<Vec<TimeEntry>, RepositoryError>;

    async fn list_user_time_entries(&self, user_id: &str)
    -> Result<Vec<TimeEntry>, RepositoryError>;

    /// Replaces the stored entry with the same id and project.
    async fn update_time_entry(&self, entry: &TimeEntry) -> Result<TimeEntry, RepositoryError>;
}
