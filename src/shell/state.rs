use crate::modules::identity::use_cases::authenticate_request::handler::AuthenticationGate;
use crate::modules::identity::use_cases::authenticate_request::verifier::RegistryLoader;
use crate::modules::projects::use_cases::add_project::handler::AddProjectHandler;
use crate::modules::projects::use_cases::update_project::handler::UpdateProjectHandler;
use crate::modules::time_entries::use_cases::add_time_entry::handler::AddTimeEntryHandler;
use crate::modules::time_entries::use_cases::start_time_entry::handler::StartTimeEntryHandler;
use crate::modules::time_entries::use_cases::stop_time_entry::handler::StopTimeEntryHandler;
use crate::modules::time_entries::use_cases::update_time_entry::handler::UpdateTimeEntryHandler;
use crate::shared::infrastructure::repository::TimelapseRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn TimelapseRepository>,
    pub authentication: Arc<AuthenticationGate>,
    pub add_project: Arc<AddProjectHandler>,
    pub update_project: Arc<UpdateProjectHandler>,
    pub add_time_entry: Arc<AddTimeEntryHandler>,
    pub update_time_entry: Arc<UpdateTimeEntryHandler>,
    pub start_time_entry: Arc<StartTimeEntryHandler>,
    pub stop_time_entry: Arc<StopTimeEntryHandler>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn TimelapseRepository>,
        registry: impl RegistryLoader + 'static,
    ) -> Self {
        Self {
            authentication: Arc::new(AuthenticationGate::new(registry, repository.clone())),
            add_project: Arc::new(AddProjectHandler::new(repository.clone())),
            update_project: Arc::new(UpdateProjectHandler::new(repository.clone())),
            add_time_entry: Arc::new(AddTimeEntryHandler::new(repository.clone())),
            update_time_entry: Arc::new(UpdateTimeEntryHandler::new(repository.clone())),
            start_time_entry: Arc::new(StartTimeEntryHandler::new(repository.clone())),
            stop_time_entry: Arc::new(StopTimeEntryHandler::new(repository.clone())),
            repository,
        }
    }
}
