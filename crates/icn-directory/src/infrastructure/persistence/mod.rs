//! In-memory repository implementations

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use crate::domain::aggregates::Company;
use crate::domain::value_objects::EntityId;
use crate::domain::DomainEvent;
use crate::ports::outbound::{CompanyRepository, EventPublisher, RepositoryError};

/// In-memory company collection. Lives for the process only.
#[derive(Default)]
pub struct InMemoryCompanyRepository {
    companies: RwLock<Vec<Company>>,
}

impl InMemoryCompanyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_companies(companies: Vec<Company>) -> Self {
        Self {
            companies: RwLock::new(companies),
        }
    }
}

#[async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
    async fn replace_all(&self, companies: Vec<Company>) -> Result<(), RepositoryError> {
        *self.companies.write() = companies;
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Company>, RepositoryError> {
        Ok(self.companies.read().clone())
    }

    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Company>, RepositoryError> {
        let companies = self.companies.read();
        Ok(companies.iter().find(|c| c.id() == id).cloned())
    }

    async fn find_many(&self, ids: &[EntityId]) -> Result<Vec<Company>, RepositoryError> {
        let companies = self.companies.read();
        Ok(ids
            .iter()
            .filter_map(|id| companies.iter().find(|c| c.id() == id).cloned())
            .collect())
    }

    async fn insert_front(&self, company: Company) -> Result<(), RepositoryError> {
        let mut companies = self.companies.write();
        if companies.iter().any(|c| c.id() == company.id()) {
            return Err(RepositoryError::DuplicateKey(company.id().to_string()));
        }
        companies.insert(0, company);
        Ok(())
    }

    async fn save(&self, company: &Company) -> Result<(), RepositoryError> {
        let mut companies = self.companies.write();
        let slot = companies
            .iter_mut()
            .find(|c| c.id() == company.id())
            .ok_or_else(|| RepositoryError::NotFound(company.id().clone()))?;
        *slot = company.clone();
        Ok(())
    }

    async fn delete(&self, id: &EntityId) -> Result<Company, RepositoryError> {
        let mut companies = self.companies.write();
        let index = companies
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        Ok(companies.remove(index))
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.companies.read().len())
    }
}

/// Discards events
#[derive(Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        Ok(())
    }
}

/// Keeps every published event, for inspection
#[derive(Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish(&self, events: Vec<DomainEvent>) -> Result<(), RepositoryError> {
        self.events.lock().extend(events);
        Ok(())
    }
}
