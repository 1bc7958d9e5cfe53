//! Outbound ports (Repository traits)
//!
//! Interfaces the infrastructure layer must implement.

use async_trait::async_trait;
use crate::domain::aggregates::Company;
use crate::domain::value_objects::EntityId;
use crate::domain::DomainEvent;

/// Company repository port. Order is significant: `all` returns companies in
/// collection order and `insert_front` prepends.
#[async_trait]
pub trait CompanyRepository: Send + Sync {
    /// Replace the whole collection
    async fn replace_all(&self, companies: Vec<Company>) -> Result<(), RepositoryError>;

    /// Snapshot of the collection in order
    async fn all(&self) -> Result<Vec<Company>, RepositoryError>;

    /// Find company by ID
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Company>, RepositoryError>;

    /// Find several companies, skipping ids that no longer exist
    async fn find_many(&self, ids: &[EntityId]) -> Result<Vec<Company>, RepositoryError>;

    /// Insert at the head of the collection
    async fn insert_front(&self, company: Company) -> Result<(), RepositoryError>;

    /// Overwrite an existing company in place
    async fn save(&self, company: &Company) -> Result<(), RepositoryError>;

    /// Remove by id, returning the removed company
    async fn delete(&self, id: &EntityId) -> Result<Company, RepositoryError>;

    /// Number of companies
    async fn count(&self) -> Result<usize, RepositoryError>;
}

/// Event publisher port
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish domain events
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError>;
}

/// Repository error type
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RepositoryError {
    #[error("entity not found: {0}")]
    NotFound(EntityId),
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    #[error("publish error: {0}")]
    PublishError(String),
}
