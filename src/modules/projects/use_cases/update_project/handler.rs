use crate::modules::projects::core::project::Project;
use crate::modules::projects::use_cases::get_project::handler::require_project;
use crate::shared::core::application_error::ApplicationError;
use crate::shared::infrastructure::repository::TimelapseRepository;
use std::sync::Arc;
use tracing::info;

/// Full replacement of a project's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateProject {
    pub name: String,
    pub description: String,
    pub billable: bool,
}

pub struct UpdateProjectHandler {
    repository: Arc<dyn TimelapseRepository>,
}

impl UpdateProjectHandler {
    pub fn new(repository: Arc<dyn TimelapseRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        user_id: &str,
        current_name: &str,
        command: UpdateProject,
    ) -> Result<Project, ApplicationError> {
        if command.name.is_empty() {
            return Err(ApplicationError::Validation("required attribute: name".into()));
        }
        let mut project = require_project(self.repository.as_ref(), user_id, current_name).await?;

        if command.name != current_name
            && self
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

        project.name = command.name;
        project.description = command.description;
        project.billable = command.billable;
        let updated = self.repository.update_project(&project).await?;
        info!(project_id = %updated.id, name = %updated.name, "Project updated");
        Ok(updated)
    }
}
