use crate::modules::identity::use_cases::authenticate_request::inbound::http::require_authentication;
use crate::modules::identity::use_cases::get_current_user::inbound::http as current_user_http;
use crate::modules::projects::use_cases::add_project::inbound::http as add_project_http;
use crate::modules::projects::use_cases::get_project::inbound::http as get_project_http;
use crate::modules::projects::use_cases::list_projects::inbound::http as list_projects_http;
use crate::modules::projects::use_cases::update_project::inbound::http as update_project_http;
use crate::modules::time_entries::use_cases::add_time_entry::inbound::http as add_entry_http;
use crate::modules::time_entries::use_cases::get_time_entry::inbound::http as get_entry_http;
use crate::modules::time_entries::use_cases::list_time_entries::inbound::http as list_entries_http;
use crate::modules::time_entries::use_cases::start_time_entry::inbound::http as start_entry_http;
use crate::modules::time_entries::use_cases::stop_time_entry::inbound::http as stop_entry_http;
use crate::modules::time_entries::use_cases::update_time_entry::inbound::http as update_entry_http;
use crate::shared::infrastructure::http::request_id::{MakeRequestUuidV7, request_span};
use crate::shell::state::AppState;
use axum::http::StatusCode;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::time::Duration;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/self", get(current_user_http::handle))
        .route(
            "/projects",
            get(list_projects_http::handle).post(add_project_http::handle),
        )
        .route(
            "/projects/{name}",
            get(get_project_http::handle).put(update_project_http::handle),
        )
        .route(
            "/projects/{name}/entries",
            get(list_entries_http::handle_project).post(add_entry_http::handle),
        )
        .route(
            "/projects/{name}/entries/{id}",
            get(get_entry_http::handle).put(update_entry_http::handle),
        )
        .route("/projects/{name}/start", post(start_entry_http::handle))
        .route("/projects/{name}/stop", post(stop_entry_http::handle))
        .route("/entries", get(list_entries_http::handle_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_authentication,
        ))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .with_state(state)
}
