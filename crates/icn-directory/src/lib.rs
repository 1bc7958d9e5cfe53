//! ICN Navigator Directory
//!
//! In-memory company directory built from the ICN capability dataset.
//!
//! ## Architecture
//!
//! - **Domain Layer**: `Company` aggregate, normalization value objects, events
//! - **Ingest**: folds the one-row-per-capability dataset into unique companies
//! - **Application Layer**: query/filter/sort/paginate and CRUD use cases
//! - **Ports Layer**: repository and use-case traits
//! - **Infrastructure Layer**: in-memory repository, simulated latency
//!
//! ## Data flow
//!
//! ```text
//!  items.json ──► DirectoryLoader ──► Vec<Company> ──► InMemoryCompanyRepository
//!                  (load once)                               │
//!                                                            ▼
//!                                   caller ──► DirectoryService (DirectoryUseCases)
//! ```

pub mod config;
pub mod error;
pub mod domain;
pub mod ingest;
pub mod application;
pub mod ports;
pub mod infrastructure;

// Re-exports for convenience
pub use config::{DirectoryConfig, LatencyConfig};
pub use error::{DirectoryError, DirectoryResult};
pub use domain::aggregates::{
    Company, CompanyPatch, CompanyProfile, CompanyType, DataSource, IcnCapability, VerificationStatus,
};
pub use domain::value_objects::{clean_field, convert_date, BillingAddress, EntityId, GeoPoint, StateCode};
pub use domain::events::{CompanyEvent, DomainEvent};
pub use ingest::{DemoEnricher, DirectoryLoader, LoadReport};
pub use application::{
    CompanyDetail, CompanyQuery, CreateCompanyCommand, DeleteReceipt, DirectoryService, DirectoryStats,
    FilterOptions, Page, SearchResults, SortKey, SortOrder, VerificationFilter,
};
pub use ports::inbound::DirectoryUseCases;
pub use ports::outbound::{CompanyRepository, EventPublisher, RepositoryError};
pub use infrastructure::persistence::{InMemoryCompanyRepository, NoOpEventPublisher, RecordingEventPublisher};
