use crate::modules::identity::core::user::{Identity, User};
use crate::modules::projects::core::project::Project;
use crate::modules::time_entries::core::time_entry::TimeEntry;
use crate::shared::infrastructure::repository::{RepositoryError, TimelapseRepository};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Everything the store holds, keyed by id. Ids are UUID v7 so key order is
/// creation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Documents {
    #[serde(default)]
    pub users: BTreeMap<String, User>,
    #[serde(default)]
    pub projects: BTreeMap<String, Project>,
    #[serde(default)]
    pub time_entries: BTreeMap<String, TimeEntry>,
}

fn new_id() -> String {
    Uuid::now_v7().to_string()
}

#[derive(Default)]
pub struct InMemoryRepository {
    documents: RwLock<Documents>,
    is_offline: bool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: Documents) -> Self {
        Self {
            documents: RwLock::new(documents),
            is_offline: false,
        }
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub async fn snapshot(&self) -> Documents {
        self.documents.read().await.clone()
    }

    /// Resolves or creates the user owning `identity`, also reporting whether
    /// the stored documents changed.
    pub async fn resolve_user(&self, identity: &Identity) -> Result<(User, bool), RepositoryError> {
        self.ensure_online()?;
        let mut documents = self.documents.write().await;

        if let Some(user) = documents
            .users
            .values_mut()
            .find(|user| user.identity_for(identity).is_some())
        {
            let changed = user.refresh_email(identity);
            return Ok((user.clone(), changed));
        }

        let user = User::new(new_id(), identity.clone());
        documents.users.insert(user.id.clone(), user.clone());
        Ok((user, true))
    }

    fn ensure_online(&self) -> Result<(), RepositoryError> {
        if self.is_offline {
            return Err(RepositoryError::Backend("repository offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TimelapseRepository for InMemoryRepository {
    async fn find_or_create_user(&self, identity: &Identity) -> Result<User, RepositoryError> {
        self.resolve_user(identity).await.map(|(user, _)| user)
    }

    async fn add_project(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        billable: bool,
    ) -> Result<Project, RepositoryError> {
        self.ensure_online()?;
        let project = Project {
            id: new_id(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            billable,
        };
        self.documents
            .write()
            .await
            .projects
            .insert(project.id.clone(), project.clone());
        Ok(project)
    }

    async fn get_project(
        &self,
        user_id: &str,
        name: &str,
    ) -> Result<Option<Project>, RepositoryError> {
        self.ensure_online()?;
        let documents = self.documents.read().await;
        Ok(documents
            .projects
            .values()
            .find(|project| project.user_id == user_id && project.name == name)
            .cloned())
    }

    async fn list_projects(&self, user_id: &str) -> Result<Vec<Project>, RepositoryError> {
        self.ensure_online()?;
        let documents = self.documents.read().await;
        Ok(documents
            .projects
            .values()
            .filter(|project| project.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_project(&self, project: &Project) -> Result<Project, RepositoryError> {
        self.ensure_online()?;
        let mut documents = self.documents.write().await;
        match documents.projects.get_mut(&project.id) {
            Some(stored) if stored.user_id == project.user_id => {
                stored.clone_from(project);
                Ok(project.clone())
            }
            _ => Err(RepositoryError::NotFound(format!("project {}", project.id))),
        }
    }

    async fn add_time_entry(&self, mut entry: TimeEntry) -> Result<TimeEntry, RepositoryError> {
        self.ensure_online()?;
        entry.id = new_id();
        self.documents
            .write()
            .await
            .time_entries
            .insert(entry.id.clone(), entry.clone());
        Ok(entry)
    }

    async fn get_time_entry(
        &self,
        project_id: &str,
        entry_id: &str,
    ) -> Result<Option<TimeEntry>, RepositoryError> {
        self.ensure_online()?;
        let documents = self.documents.read().await;
        Ok(documents
            .time_entries
            .get(entry_id)
            .filter(|entry| entry.project_id == project_id)
            .cloned())
    }

    async fn list_time_entries(&self, project_id: &str) -> Result<Vec<TimeEntry>, RepositoryError> {
        self.ensure_online()?;
        let documents = self.documents.read().await;
        Ok(documents
            .time_entries
            .values()
            .filter(|entry| entry.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn list_user_time_entries(
        &self,
        user_id: &str,
    ) -> Result<Vec<TimeEntry>, RepositoryError> {
        self.ensure_online()?;
        let documents = self.documents.read().await;
        Ok(documents
            .time_entries
            .values()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_time_entry(&self, entry: &TimeEntry) -> Result<TimeEntry, RepositoryError> {
        self.ensure_online()?;
        let mut documents = self.documents.write().await;
        match documents.time_entries.get_mut(&entry.id) {
            Some(stored) if stored.project_id == entry.project_id => {
                stored.clone_from(entry);
                Ok(entry.clone())
            }
            _ => Err(RepositoryError::NotFound(format!("time entry {}", entry.id))),
        }
    }
}
