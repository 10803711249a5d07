use crate::modules::time_entries::core::time_entry::TimeEntryRejection;
use crate::shared::infrastructure::repository::RepositoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Domain(#[from] TimeEntryRejection),
}
