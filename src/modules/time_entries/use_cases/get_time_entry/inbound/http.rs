use crate::contracts::time_entry::TimeEntryResource;
use crate::modules::identity::core::user::User;
use crate::modules::projects::use_cases::get_project::handler::require_project;
use crate::shared::infrastructure::http::error::ApiError;
use crate::shell::state::AppState;
use axum::extract::{Path, State};
use axum::{Extension, Json};

pub async fn handle(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path((project_name, entry_id)): Path<(String, String)>,
) -> Result<Json<TimeEntryResource>, ApiError> {
    let project = require_project(state.repository.as_ref(), &user.id, &project_name).await?;
    let entry = state
        .repository
        .get_time_entry(&project.id, &entry_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Time entry not found: {project_name}/{entry_id}"))
        })?;
    Ok(Json(TimeEntryResource::from_entry(&entry, &project.name)))
}
