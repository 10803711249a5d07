use crate::contracts::project::ProjectResource;
use crate::modules::identity::core::user::User;
use crate::shared::infrastructure::http::error::ApiError;
use crate::shell::state::AppState;
use axum::extract::State;
use axum::{Extension, Json};

pub async fn handle(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<ProjectResource>>, ApiError> {
    let projects = state.repository.list_projects(&user.id).await?;
    Ok(Json(projects.iter().map(ProjectResource::from).collect()))
}
