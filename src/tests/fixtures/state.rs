use crate::modules::identity::core::user::{Identity, User};
use crate::modules::projects::core::project::Project;
use crate::modules::time_entries::core::time_entry::TimeEntry;
use crate::shared::infrastructure::repository::TimelapseRepository;
use crate::shared::infrastructure::repository::in_memory::InMemoryRepository;
use crate::shell::http::router;
use crate::shell::state::AppState;
use crate::tests::fixtures::entries::TimeEntryBuilder;
use crate::tests::fixtures::tokens::{TEST_ISSUER, issue_token, test_registry};
use axum::Router;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Builder;
use std::sync::Arc;
use std::time::Duration;

pub const OWNER_SUBJECT: &str = "owner-subject";
pub const OWNER_EMAIL: &str = "owner@example.com";

pub fn make_test_state() -> (AppState, Arc<InMemoryRepository>) {
    let repository = Arc::new(InMemoryRepository::new());
    (AppState::new(repository.clone(), test_registry()), repository)
}

pub fn make_offline_state() -> (AppState, Arc<InMemoryRepository>) {
    let mut repository = InMemoryRepository::new();
    repository.toggle_offline();
    let repository = Arc::new(repository);
    (AppState::new(repository.clone(), test_registry()), repository)
}

pub fn test_app(state: AppState) -> Router {
    router(state, Duration::from_secs(5))
}

/// Adds a bearer token of the owner identity.
pub fn authorized(request: Builder) -> Builder {
    let token = issue_token(TEST_ISSUER, OWNER_SUBJECT, OWNER_EMAIL);
    request.header(AUTHORIZATION, format!("Bearer {token}"))
}

pub fn owner_identity() -> Identity {
    Identity {
        issuer: TEST_ISSUER.to_string(),
        subject_id: OWNER_SUBJECT.to_string(),
        email: OWNER_EMAIL.to_string(),
    }
}

pub async fn owner(repository: &InMemoryRepository) -> User {
    repository
        .find_or_create_user(&owner_identity())
        .await
        .unwrap()
}

pub async fn seed_project(repository: &InMemoryRepository, name: &str) -> Project {
    let owner = owner(repository).await;
    repository
        .add_project(&owner.id, name, "", true)
        .await
        .unwrap()
}

pub async fn seed_entry(repository: &InMemoryRepository, project: &Project) -> TimeEntry {
    repository
        .add_time_entry(
            TimeEntryBuilder::new()
                .project_id(&project.id)
                .user_id(&project.user_id)
                .build(),
        )
        .await
        .unwrap()
}
