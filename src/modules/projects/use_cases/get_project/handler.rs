use crate::modules::projects::core::project::Project;
use crate::shared::core::application_error::ApplicationError;
use crate::shared::infrastructure::repository::TimelapseRepository;

/// Loads the caller's project by name or fails with `NotFound`.
pub async fn require_project(
    repository: &dyn TimelapseRepository,
    user_id: &str,
    name: &str,
) -> Result<Project, ApplicationError> {
    repository
        .get_project(user_id, name)
        .await?
        .ok_or_else(|| ApplicationError::NotFound(format!("Project not found: {name}")))
}
