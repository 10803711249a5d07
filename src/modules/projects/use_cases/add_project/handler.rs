use crate::modules::projects::core::project::Project;
use crate::shared::core::application_error::ApplicationError;
use crate::shared::infrastructure::repository::TimelapseRepository;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddProject {
    pub name: String,
    pub description: String,
    pub billable: bool,
}

pub struct AddProjectHandler {
    repository: Arc<dyn TimelapseRepository>,
}

impl AddProjectHandler {
    pub fn new(repository: Arc<dyn TimelapseRepository>) -> Self {
        Self { repository }
    }

    /// Project names are unique per user. The check and the insert are not
    /// atomic, so concurrent adds of one name can both succeed.
    pub async fn handle(&self, user_id: &str, command: AddProject) -> Result<Project, ApplicationError> {
        if command.name.is_empty() {
            return Err(ApplicationError::Validation("required attribute: name".into()));
        }
        if self
            .repository
            .get_project(user_id, &command.name)
            .await?
            .is_some()
        {
            return Err(ApplicationError::Validation(format!(
                "A project with this name already exists: {}",
                command.name
            )));
        }

        let project = self
            .repository
            .add_project(user_id, &command.name, &command.description, command.billable)
            .await?;
        info!(project_id = %project.id, name = %project.name, "Project added");
        Ok(project)
    }
}
