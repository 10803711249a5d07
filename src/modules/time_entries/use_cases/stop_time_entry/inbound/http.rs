use crate::contracts::time_entry::{StopRequest, TimeEntryResource};
use crate::modules::identity::core::user::User;
use crate::modules::time_entries::use_cases::stop_time_entry::handler::StopTimeEntry;
use crate::shared::infrastructure::http::error::ApiError;
use crate::shared::infrastructure::http::json_body::JsonBody;
use crate::shell::state::AppState;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::Utc;

pub async fn handle(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(project_name): Path<String>,
    JsonBody(body): JsonBody<StopRequest>,
) -> Result<Json<TimeEntryResource>, ApiError> {
    let command = StopTimeEntry {
        end: body.end,
        breaks: body.breaks,
    };
    let entry = state
        .stop_time_entry
        .handle(&user.id, &project_name, command, Utc::now())
        .await?;
    Ok(Json(TimeEntryResource::from_entry(&entry, &project_name)))
}
