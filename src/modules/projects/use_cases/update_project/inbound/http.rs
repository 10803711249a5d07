use crate::contracts::project::ProjectResource;
use crate::modules::identity::core::user::User;
use crate::modules::projects::use_cases::update_project::handler::UpdateProject;
use crate::shared::infrastructure::http::error::ApiError;
use crate::shared::infrastructure::http::json_body::JsonBody;
use crate::shell::state::AppState;
use axum::extract::{Path, State};
use axum::{Extension, Json};

pub async fn handle(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(name): Path<String>,
    JsonBody(body): JsonBody<ProjectResource>,
) -> Result<Json<ProjectResource>, ApiError> {
    let command = UpdateProject {
        name: body.name,
        description: body.description,
        billable: body.billable,
    };
    let project = state.update_project.handle(&user.id, &name, command).await?;
    Ok(Json(ProjectResource::from(&project)))
}
