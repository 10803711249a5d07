use crate::contracts::project::ProjectResource;
use crate::modules::identity::core::user::User;
use crate::modules::projects::use_cases::add_project::handler::AddProject;
use crate::shared::infrastructure::http::error::ApiError;
use crate::shared::infrastructure::http::json_body::JsonBody;
use crate::shell::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};

pub async fn handle(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonBody(body): JsonBody<ProjectResource>,
) -> Result<(StatusCode, Json<ProjectResource>), ApiError> {
    let command = AddProject {
        name: body.name,
        description: body.description,
        billable: body.billable,
    };
    let project = state.add_project.handle(&user.id, command).await?;
    Ok((StatusCode::CREATED, Json(ProjectResource::from(&project))))
}
