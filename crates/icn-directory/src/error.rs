//! Error types for the directory

use thiserror::Error;

use crate::domain::value_objects::EntityId;
use crate::ports::outbound::RepositoryError;

/// Directory error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DirectoryError {
    /// Requested company id does not exist
    #[error("company not found: {0}")]
    NotFound(EntityId),

    /// Dataset could not be read or is not an array of items
    #[error("data load failed: {0}")]
    DataLoad(String),

    /// Command rejected before touching the store
    #[error("validation error: {0}")]
    Validation(String),

    /// Repository failure other than not-found
    #[error("repository error: {0}")]
    Repository(String),
}

impl DirectoryError {
    /// True for the not-found condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<RepositoryError> for DirectoryError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => Self::NotFound(id),
            other => Self::Repository(other.to_string()),
        }
    }
}

/// Result type for the directory
pub type DirectoryResult<T> = Result<T, DirectoryError>;
