// Document store persisted as one JSON file.
//
// Reads are served from memory. Every mutation rewrites the whole snapshot to
// a sibling temporary file which is then renamed over the target.

use crate::modules::identity::core::user::{Identity, User};
use crate::modules::projects::core::project::Project;
use crate::modules::time_entries::core::time_entry::TimeEntry;
use crate::shared::infrastructure::repository::in_memory::{Documents, InMemoryRepository};
use crate::shared::infrastructure::repository::{RepositoryError, TimelapseRepository};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};

const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

pub struct JsonFileRepository {
    inner: InMemoryRepository,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileRepository {
    /// Loads `path` if it exists; a missing file starts an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let documents = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice::<Documents>(&bytes).map_err(|error| {
                RepositoryError::Backend(format!("cannot decode {}: {error}", path.display()))
            })?,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Documents::default(),
            Err(error) => {
                return Err(RepositoryError::Backend(format!(
                    "cannot read {}: {error}",
                    path.display()
                )));
            }
        };
        info!(
            path = %path.display(),
            users = documents.users.len(),
            projects = documents.projects.len(),
            time_entries = documents.time_entries.len(),
            "Loaded document store"
        );
        Ok(Self {
            inner: InMemoryRepository::from_documents(documents),
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let snapshot = self.inner.snapshot().await;
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|error| RepositoryError::Backend(format!("cannot encode store: {error}")))?;

        tokio::time::timeout(WRITE_TIMEOUT, write_atomically(&self.path, &bytes))
            .await
            .map_err(|_| {
                RepositoryError::Backend(format!("timed out writing {}", self.path.display()))
            })?
            .map_err(|error| {
                RepositoryError::Backend(format!("cannot write {}: {error}", self.path.display()))
            })?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Persisted document store");
        Ok(())
    }
}

async fn write_atomically(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut temporary = path.as_os_str().to_owned();
    temporary.push(".tmp");
    tokio::fs::write(&temporary, bytes).await?;
    tokio::fs::rename(&temporary, path).await
}

#[async_trait]
impl TimelapseRepository for JsonFileRepository {
    async fn find_or_create_user(&self, identity: &Identity) -> Result<User, RepositoryError> {
        let (user, changed) = self.inner.resolve_user(identity).await?;
        if changed {
            self.persist().await?;
        }
        Ok(user)
    }

    async fn add_project(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        billable: bool,
    ) -> Result<Project, RepositoryError> {
        let project = self
            .inner
            .add_project(user_id, name, description, billable)
            .await?;
        self.persist().await?;
        Ok(project)
    }

    async fn get_project(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<Project>, RepositoryError> {
        self.inner.get_project(user_id, name).await
    }

    async fn list_projects(&self, user_id: &str) -> Result<Vec<Project>, RepositoryError> {
        self.inner.list_projects(user_id).await
    }

    async fn update_project(&self, project: &Project) -> Result<Project, RepositoryError> {
        let project = self.inner.update_project(project).await?;
        self.persist().await?;
        Ok(project)
    }

    async fn add_time_entry(&self, entry: TimeEntry) -> Result<TimeEntry, RepositoryError> {
        let entry = self.inner.add_time_entry(entry).await?;
        self.persist().await?;
        Ok(entry)
    }

    async fn get_time_entry(
        &self,
        project_id: &str,
        entry_id: &str,
    ) -> Result<Option<TimeEntry>, RepositoryError> {
        self.inner.get_time_entry(project_id, entry_id).await
    }

    async fn list_time_entries(&self, project_id: &str) -> Result<Vec<TimeEntry>, RepositoryError> {
        self.inner.list_time_entries(project_id).await
    }

    async fn list_user_time_entries(
        &self,
        user_id: &str,
    ) -> Result<Vec<TimeEntry>, RepositoryError> {
        self.inner.list_user_time_entries(user_id).await
    }

    async fn update_time_entry(&self, entry: &TimeEntry) -> Result<TimeEntry, RepositoryError> {
        let entry = self.inner.update_time_entry(entry).await?;
        self.persist().await?;
        Ok(entry)
    }
}
