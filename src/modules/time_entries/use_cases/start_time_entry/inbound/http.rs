use crate::contracts::time_entry::{StartRequest, TimeEntryResource};
use crate::modules::identity::core::user::User;
use crate::modules::time_entries::use_cases::start_time_entry::handler::StartTimeEntry;
use crate::shared::infrastructure::http::error::ApiError;
use crate::shared::infrastructure::http::json_body::JsonBody;
use crate::shell::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;

pub async fn handle(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(project_name): Path<String>,
    JsonBody(body): JsonBody<StartRequest>,
) -> Result<(StatusCode, Json<TimeEntryResource>), ApiError> {
    let command = StartTimeEntry {
        entry_type: body.entry_type,
        start: body.start,
        breaks: body.breaks,
        comment: body.comment,
    };
    let entry = state
        .start_time_entry
        .handle(&user.id, &project_name, command, Utc::now())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(TimeEntryResource::from_entry(&entry, &project_name)),
    ))
}
