//! Inbound ports (Use case traits)
//!
//! Hexagonal architecture: application service interfaces.

use async_trait::async_trait;

use crate::application::dto::*;
use crate::domain::aggregates::{Company, CompanyPatch};
use crate::domain::value_objects::EntityId;
use crate::error::DirectoryResult;

/// Directory use cases
#[async_trait]
pub trait DirectoryUseCases: Send + Sync {
    /// Filter, sort and page the collection
    async fn get_all(&self, query: &CompanyQuery) -> DirectoryResult<Page<Company>>;

    /// Company with derived detail fields
    async fn get_by_id(&self, id: &EntityId) -> DirectoryResult<CompanyDetail>;

    /// Free-text search, capped
    async fn search(&self, text: &str) -> DirectoryResult<SearchResults>;

    /// Create a manually entered company
    async fn create(&self, command: CreateCompanyCommand) -> DirectoryResult<Company>;

    /// Shallow update
    async fn update(&self, id: &EntityId, patch: CompanyPatch) -> DirectoryResult<Company>;

    async fn delete(&self, id: &EntityId) -> DirectoryResult<DeleteReceipt>;

    async fn statistics(&self) -> DirectoryResult<DirectoryStats>;

    async fn filter_options(&self) -> DirectoryResult<FilterOptions>;

    /// Companies for the given ids, in id order; unknown ids are skipped
    async fn get_many(&self, ids: &[EntityId]) -> DirectoryResult<Vec<Company>>;
}
