use crate::contracts::time_entry::TimeEntryResource;
use crate::modules::identity::core::user::User;
use crate::modules::projects::use_cases::get_project::handler::require_project;
use crate::modules::time_entries::core::time_entry::sort_by_start;
use crate::shared::infrastructure::http::error::ApiError;
use crate::shell::state::AppState;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use std::collections::HashMap;

/// `GET /projects/{name}/entries`
pub async fn handle_project(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(project_name): Path<String>,
) -> Result<Json<Vec<TimeEntryResource>>, ApiError> {
    let project = require_project(state.repository.as_ref(), &user.id, &project_name).await?;
    let mut entries = state.repository.list_time_entries(&project.id).await?;
    sort_by_start(&mut entries);
    Ok(Json(
        entries
            .iter()
            .map(|entry| TimeEntryResource::from_entry(entry, &project.name))
            .collect(),
    ))
}

/// `GET /entries`: every entry of the caller across projects.
pub async fn handle_user(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<TimeEntryResource>>, ApiError> {
    let project_names: HashMap<String, String> = state
        .repository
        .list_projects(&user.id)
        .await?
        .into_iter()
        .map(|project| (project.id, project.name))
        .collect();
    let mut entries = state.repository.list_user_time_entries(&user.id).await?;
    sort_by_start(&mut entries);

    let resources = entries
        .iter()
        .map(|entry| {
            let project_name = project_names
                .get(&entry.project_id)
                .map(String::as_str)
                .unwrap_or_default();
            TimeEntryResource::from_entry(entry, project_name)
        })
        .collect();
    Ok(Json(resources))
}
