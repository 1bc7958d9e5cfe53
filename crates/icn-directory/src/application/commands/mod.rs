//! Command handlers
//!
//! Application service that orchestrates the directory use cases.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::application::dto::*;
use crate::application::queries;
use crate::config::DirectoryConfig;
use crate::domain::aggregates::{Company, CompanyPatch, CompanyType};
use crate::domain::events::{CompanyEvent, DomainEvent};
use crate::domain::value_objects::{clean_field, BillingAddress, EntityId};
use crate::error::{DirectoryError, DirectoryResult};
use crate::infrastructure::latency::SimulatedLatency;
use crate::infrastructure::persistence::{InMemoryCompanyRepository, NoOpEventPublisher};
use crate::ingest::{DirectoryLoader, LoadReport};
use crate::ports::inbound::DirectoryUseCases;
use crate::ports::outbound::{CompanyRepository, EventPublisher};

/// Directory application service
pub struct DirectoryService {
    repo: Arc<dyn CompanyRepository>,
    publisher: Arc<dyn EventPublisher>,
    loader: DirectoryLoader,
    /// Set once the repository has been populated from the loader
    populated: tokio::sync::Mutex<bool>,
    latency: SimulatedLatency,
    config: DirectoryConfig,
}

impl DirectoryService {
    pub fn new(
        repo: Arc<dyn CompanyRepository>,
        publisher: Arc<dyn EventPublisher>,
        config: DirectoryConfig,
    ) -> Self {
        Self {
            repo,
            publisher,
            loader: DirectoryLoader::new(config.clone()),
            populated: tokio::sync::Mutex::new(false),
            latency: SimulatedLatency::new(config.latency.clone()),
            config,
        }
    }

    /// Service over a fresh in-memory repository that discards events
    pub fn in_memory(config: DirectoryConfig) -> Self {
        Self::new(
            Arc::new(InMemoryCompanyRepository::new()),
            Arc::new(NoOpEventPublisher),
            config,
        )
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Populate the repository from a raw dataset. Only the first successful
    /// load touches the repository; later calls return the original report.
    pub async fn load(&self, raw: &Value) -> DirectoryResult<LoadReport> {
        let mut populated = self.populated.lock().await;
        if *populated {
            debug!("directory already populated");
            return self.cached_report();
        }

        let companies = self.loader.load(raw)?;
        self.repo.replace_all(companies.as_ref().clone()).await?;
        *populated = true;

        let report = self.cached_report()?;
        self.publisher
            .publish(vec![DomainEvent::DatasetLoaded {
                companies: report.companies,
                skipped_rows: report.skipped(),
                loaded_at: Utc::now(),
            }])
            .await?;
        Ok(report)
    }

    /// Read and load a JSON dataset file
    pub async fn load_path(&self, path: &Path) -> DirectoryResult<LoadReport> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DirectoryError::DataLoad(format!("{}: {}", path.display(), e)))?;
        let raw: Value = serde_json::from_str(&content).map_err(|e| DirectoryError::DataLoad(e.to_string()))?;
        self.load(&raw).await
    }

    fn cached_report(&self) -> DirectoryResult<LoadReport> {
        self.loader
            .report()
            .ok_or_else(|| DirectoryError::DataLoad("dataset has not been loaded".into()))
    }

    async fn publish(&self, event: CompanyEvent) -> DirectoryResult<()> {
        self.publisher.publish(vec![DomainEvent::Company(event)]).await?;
        Ok(())
    }
}

#[async_trait]
impl DirectoryUseCases for DirectoryService {
    #[instrument(skip(self, query))]
    async fn get_all(&self, query: &CompanyQuery) -> DirectoryResult<Page<Company>> {
        self.latency.wait().await;
        let companies = self.repo.all().await?;
        let page = queries::run_query(companies, query, self.config.default_page_size);
        debug!(total = page.total, page = page.page, "query served");
        Ok(page)
    }

    async fn get_by_id(&self, id: &EntityId) -> DirectoryResult<CompanyDetail> {
        self.latency.wait().await;
        let company = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(id.clone()))?;
        Ok(CompanyDetail::from_company(company))
    }

    async fn search(&self, text: &str) -> DirectoryResult<SearchResults> {
        self.latency.wait().await;
        let companies = self.repo.all().await?;
        let mut data = queries::filter_companies(companies, &CompanyQuery::new().with_search(text));
        let total = data.len();
        data.truncate(self.config.search_result_cap);
        Ok(SearchResults { data, total })
    }

    #[instrument(skip(self, command), fields(name = %command.name))]
    async fn create(&self, command: CreateCompanyCommand) -> DirectoryResult<Company> {
        self.latency.wait().await;
        let name = clean_field(&command.name)
            .ok_or_else(|| DirectoryError::Validation("company name is required".into()))?;

        let billing = BillingAddress::from_parts(
            command.street.as_deref(),
            command.city.as_deref(),
            command.state.as_deref(),
            command.postcode.as_deref(),
        );
        let mut company = Company::manual(name, billing, command.company_type.unwrap_or(CompanyType::Supplier));
        for sector in &command.key_sectors {
            company.add_sector(sector);
        }
        for capability in &command.capabilities {
            company.add_capability(capability);
        }
        if let Some(profile) = command.profile {
            company.set_profile(profile);
        }

        self.repo.insert_front(company.clone()).await?;
        self.publish(CompanyEvent::Created {
            company_id: company.id().clone(),
            name: company.name().to_string(),
            created_at: company.created_at(),
        })
        .await?;

        info!(id = %company.id(), "company created");
        Ok(company)
    }

    async fn update(&self, id: &EntityId, patch: CompanyPatch) -> DirectoryResult<Company> {
        self.latency.wait().await;
        let mut company = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DirectoryError::NotFound(id.clone()))?;

        company.apply_patch(patch);
        self.repo.save(&company).await?;
        self.publish(CompanyEvent::Updated {
            company_id: id.clone(),
            updated_at: company.updated_at(),
        })
        .await?;

        Ok(company)
    }

    async fn delete(&self, id: &EntityId) -> DirectoryResult<DeleteReceipt> {
        self.latency.wait().await;
        let removed = self.repo.delete(id).await?;
        self.publish(CompanyEvent::Deleted {
            company_id: id.clone(),
            deleted_at: Utc::now(),
        })
        .await?;

        info!(id = %id, name = removed.name(), "company deleted");
        Ok(DeleteReceipt {
            success: true,
            id: id.clone(),
        })
    }

    async fn statistics(&self) -> DirectoryResult<DirectoryStats> {
        let companies = self.repo.all().await?;
        Ok(queries::statistics(&companies))
    }

    async fn filter_options(&self) -> DirectoryResult<FilterOptions> {
        let companies = self.repo.all().await?;
        Ok(queries::filter_options(&companies))
    }

    async fn get_many(&self, ids: &[EntityId]) -> DirectoryResult<Vec<Company>> {
        Ok(self.repo.find_many(ids).await?)
    }
}
