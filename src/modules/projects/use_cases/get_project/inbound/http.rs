use crate::contracts::project::ProjectResource;
use crate::modules::identity::core::user::User;
use crate::modules::projects::use_cases::get_project::handler::require_project;
use crate::shared::infrastructure::http::error::ApiError;
use crate::shell::state::AppState;
use axum::extract::{Path, State};
use axum::{Extension, Json};

pub async fn handle(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(name): Path<String>,
) -> Result<Json<ProjectResource>, ApiError> {
    let project = require_project(state.repository.as_ref(), &user.id, &name).await?;
    Ok(Json(ProjectResource::from(&project)))
}
