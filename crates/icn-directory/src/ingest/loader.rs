//! Dataset loader
//!
//! Folds the denormalized item rows into unique companies in a single pass.
//! The result is memoized: once a dataset has been loaded, further calls hand
//! back the same collection without touching the input.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::DirectoryConfig;
use crate::domain::aggregates::{Company, IcnCapability};
use crate::domain::value_objects::{clean_field, parse_validation_date, BillingAddress, EntityId, GeoPoint};
use crate::error::{DirectoryError, DirectoryResult};
use crate::ingest::enrichment::DemoEnricher;
use crate::ingest::records::{RawItem, RawOrganization};

/// Maximum offset, in degrees, applied to state-level coordinates
const COORDINATE_JITTER_DEG: f64 = 0.25;

/// Counters from one load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub items_seen: usize,
    pub items_skipped: usize,
    pub rows_seen: usize,
    pub rows_skipped: usize,
    pub companies: usize,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.items_skipped + self.rows_skipped
    }
}

struct LoadedDataset {
    companies: Arc<Vec<Company>>,
    report: LoadReport,
}

/// Memoizing dataset loader
pub struct DirectoryLoader {
    config: DirectoryConfig,
    loaded: Mutex<Option<LoadedDataset>>,
}

impl DirectoryLoader {
    pub fn new(config: DirectoryConfig) -> Self {
        Self {
            config,
            loaded: Mutex::new(None),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.lock().is_some()
    }

    /// Report from the load that populated the cache
    pub fn report(&self) -> Option<LoadReport> {
        self.loaded.lock().as_ref().map(|d| d.report.clone())
    }

    /// Load from a parsed JSON document. Must be an array of items.
    pub fn load(&self, raw: &Value) -> DirectoryResult<Arc<Vec<Company>>> {
        let mut loaded = self.loaded.lock();
        if let Some(dataset) = loaded.as_ref() {
            debug!("dataset already loaded, returning cached companies");
            return Ok(Arc::clone(&dataset.companies));
        }

        let items = raw
            .as_array()
            .ok_or_else(|| DirectoryError::DataLoad("dataset is not an array of items".into()))?;

        let (mut companies, report) = normalize_items(items, self.config.seed);
        if self.config.enrich_demo_data {
            DemoEnricher::new(self.config.seed).enrich(&mut companies);
        }

        info!(
            companies = report.companies,
            items = report.items_seen,
            rows = report.rows_seen,
            skipped = report.skipped(),
            "dataset loaded"
        );

        let companies = Arc::new(companies);
        *loaded = Some(LoadedDataset {
            companies: Arc::clone(&companies),
            report,
        });
        Ok(companies)
    }

    /// Load from JSON text
    pub fn load_str(&self, json: &str) -> DirectoryResult<Arc<Vec<Company>>> {
        if let Some(dataset) = self.loaded.lock().as_ref() {
            return Ok(Arc::clone(&dataset.companies));
        }
        let raw: Value = serde_json::from_str(json).map_err(|e| DirectoryError::DataLoad(e.to_string()))?;
        self.load(&raw)
    }

    /// Load from a JSON file
    pub fn load_path(&self, path: &Path) -> DirectoryResult<Arc<Vec<Company>>> {
        if let Some(dataset) = self.loaded.lock().as_ref() {
            return Ok(Arc::clone(&dataset.companies));
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| DirectoryError::DataLoad(format!("{}: {}", path.display(), e)))?;
        self.load_str(&content)
    }
}

/// Single pass over the items, grouping rows by organization id in order of
/// first sighting. Malformed items and rows without a usable organization id
/// are skipped and logged.
pub fn normalize_items(items: &[Value], seed: u64) -> (Vec<Company>, LoadReport) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut report = LoadReport {
        items_seen: items.len(),
        ..Default::default()
    };
    let mut companies: Vec<Company> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (item_index, raw_item) in items.iter().enumerate() {
        let item: RawItem = match serde_json::from_value(raw_item.clone()) {
            Ok(item) => item,
            Err(e) => {
                warn!(item_index, error = %e, "skipping malformed item");
                report.items_skipped += 1;
                continue;
            }
        };

        let item_id = item.item_id.as_deref().and_then(clean_field);
        if item_id.is_none() && item.organizations.is_empty() {
            warn!(item_index, "skipping item without identifier or organizations");
            report.items_skipped += 1;
            continue;
        }

        let item_name = item.item_name.as_deref().and_then(clean_field);
        let detailed_item_name = item.detailed_item_name.as_deref().and_then(clean_field);
        let item_sector = item.sector_name.as_deref().and_then(clean_field);
        let sector_mapping_id = item.sector_mapping_id.as_deref().and_then(clean_field);

        for (row_index, raw_org) in item.organizations.iter().enumerate() {
            report.rows_seen += 1;

            let org: RawOrganization = match serde_json::from_value(raw_org.clone()) {
                Ok(org) => org,
                Err(e) => {
                    warn!(item_index, row_index, error = %e, "skipping malformed organization row");
                    report.rows_skipped += 1;
                    continue;
                }
            };
            let Some(org_id) = org.organization_id.as_deref().and_then(clean_field) else {
                warn!(item_index, row_index, "skipping organization row without usable id");
                report.rows_skipped += 1;
                continue;
            };

            let capability = IcnCapability {
                capability_id: org.capability_id.as_deref().and_then(clean_field),
                item_id: item_id.clone(),
                item_name: item_name.clone(),
                detailed_item_name: detailed_item_name.clone(),
                capability_type: org.capability_type.as_deref().and_then(clean_field),
                sector_name: org.sector_name.as_deref().and_then(clean_field).or_else(|| item_sector.clone()),
                sector_mapping_id: sector_mapping_id.clone(),
            };
            let validation_date = org.validation_date.as_deref().and_then(parse_validation_date);

            match index.get(&org_id) {
                Some(&position) => {
                    let company = &mut companies[position];
                    company.record_validation_date(validation_date);
                    company.record_capability(capability);
                }
                None => {
                    let mut company = seed_company(&org_id, &org, validation_date, &mut rng);
                    company.record_capability(capability);
                    index.insert(org_id, companies.len());
                    companies.push(company);
                }
            }
        }
    }

    report.companies = companies.len();
    (companies, report)
}

fn seed_company(
    org_id: &str,
    org: &RawOrganization,
    validation_date: Option<chrono::NaiveDate>,
    rng: &mut StdRng,
) -> Company {
    let street = org.street.as_deref().and_then(clean_field);
    let city = org.city.as_deref().and_then(clean_field);
    let state = org.state.as_deref().and_then(clean_field);
    let postcode = org.postcode.as_deref().and_then(clean_field);
    let name = org.organization_name.as_deref().and_then(clean_field);

    let billing = BillingAddress::from_parts(street.as_deref(), city.as_deref(), state.as_deref(), postcode.as_deref());
    let centre = billing.state.default_location();
    let location = GeoPoint::new(
        centre.latitude + rng.gen_range(-COORDINATE_JITTER_DEG..COORDINATE_JITTER_DEG),
        centre.longitude + rng.gen_range(-COORDINATE_JITTER_DEG..COORDINATE_JITTER_DEG),
    );

    Company::imported(EntityId::from_string(org_id), name.as_deref(), billing, location, validation_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::{CompanyType, VerificationStatus};
    use crate::domain::value_objects::StateCode;
    use serde_json::json;

    fn dataset() -> Value {
        json!([
            {
                "itemId": "I-1",
                "itemName": "Armour plate",
                "sectorName": "Defence",
                "organizations": [
                    {
                        "organizationId": "ORG-1",
                        "organizationName": "Acme Fabrication",
                        "capabilityType": "Manufacturer",
                        "validationDate": "15/06/2024",
                        "street": "1 Steel Rd",
                        "city": "Geelong",
                        "state": "Victoria",
                        "postcode": 3220
                    },
                    {"organizationId": "#N/A", "organizationName": "Ghost"},
                    {"organizationId": "ORG-2", "organizationName": "N/A", "capabilityType": "Supplier", "city": "Perth"}
                ]
            },
            {
                "itemId": "I-2",
                "itemName": "Rail sleepers",
                "detailedItemName": "Concrete rail sleepers",
                "sectorName": "Rail",
                "organizations": [
                    {"organizationId": "ORG-1", "capabilityType": "Supplier"},
                    {"organizationId": "NULL"},
                    {"organizationId": ""}
                ]
            },
            {"itemId": "#N/A", "organizations": []},
            "not an object",
            {"itemId": "I-3", "sectorName": "Mining", "organizations": [{"organizationId": 77, "validationDate": "#N/A"}]}
        ])
    }

    #[test]
    fn test_rows_merge_by_organization_id() {
        let (companies, report) = normalize_items(dataset().as_array().unwrap(), 1);

        let ids: Vec<&str> = companies.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(ids, ["ORG-1", "ORG-2", "77"]);

        let acme = &companies[0];
        assert_eq!(acme.name(), "Acme Fabrication");
        assert_eq!(acme.key_sectors(), ["Defence", "Rail"]);
        assert_eq!(acme.capabilities(), ["Armour plate", "Concrete rail sleepers"]);
        assert_eq!(acme.company_type(), CompanyType::Both);
        assert_eq!(acme.verification_status(), VerificationStatus::Verified);
        assert_eq!(acme.state(), StateCode::VIC);
        assert_eq!(acme.billing_address().postcode, "3220");
        assert_eq!(acme.icn_capabilities().len(), 2);

        assert_eq!(report.items_seen, 5);
        assert_eq!(report.items_skipped, 2);
        assert_eq!(report.rows_seen, 7);
        assert_eq!(report.rows_skipped, 3);
        assert_eq!(report.companies, 3);
    }

    #[test]
    fn test_placeholders_and_state_fallback() {
        let (companies, _) = normalize_items(dataset().as_array().unwrap(), 1);

        let org2 = &companies[1];
        assert_eq!(org2.name(), Company::NAME_PLACEHOLDER);
        assert_eq!(org2.state(), StateCode::WA);
        assert_eq!(org2.company_type(), CompanyType::Supplier);
        assert!(!org2.is_verified());

        let org77 = &companies[2];
        assert_eq!(org77.state(), StateCode::NSW);
        assert_eq!(org77.key_sectors(), ["Mining"]);
        assert_eq!(org77.verification_status(), VerificationStatus::Unverified);
    }

    #[test]
    fn test_coordinates_jitter_near_state_centre() {
        let (companies, _) = normalize_items(dataset().as_array().unwrap(), 99);
        for company in &companies {
            let centre = company.state().default_location();
            let here = company.location();
            assert!((here.latitude - centre.latitude).abs() <= COORDINATE_JITTER_DEG);
            assert!((here.longitude - centre.longitude).abs() <= COORDINATE_JITTER_DEG);
        }
    }

    #[test]
    fn test_load_is_memoized() {
        let loader = DirectoryLoader::new(DirectoryConfig::default());
        let first = loader.load(&dataset()).unwrap();
        let second = loader.load(&json!([])).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 3);
        assert_eq!(loader.report().unwrap().companies, 3);
    }

    #[test]
    fn test_non_array_is_data_load_error() {
        let loader = DirectoryLoader::new(DirectoryConfig::default());
        let err = loader.load(&json!({"items": []})).unwrap_err();
        assert!(matches!(err, DirectoryError::DataLoad(_)));
        assert!(!loader.is_loaded());

        assert!(matches!(loader.load_str("{not json"), Err(DirectoryError::DataLoad(_))));
    }

    #[test]
    fn test_enrichment_is_opt_in() {
        let plain = DirectoryLoader::new(DirectoryConfig::default());
        let companies = plain.load(&dataset()).unwrap();
        assert!(companies.iter().all(|c| c.rating().is_none()));

        let config = DirectoryConfig { enrich_demo_data: true, ..Default::default() };
        let enriched = DirectoryLoader::new(config).load(&dataset()).unwrap();
        assert!(enriched.iter().all(|c| c.rating().is_some()));
    }
}
