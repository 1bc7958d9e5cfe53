//! Data Transfer Objects (DTOs)
//!
//! Query parameters, commands and result envelopes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::aggregates::{Company, CompanyProfile, CompanyType};
use crate::domain::value_objects::{EntityId, GeoPoint, StateCode};

// =============================================================================
// Query parameters
// =============================================================================

/// Verification filter; `All` disables filtering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerificationFilter {
    #[default]
    All,
    Verified,
    Unverified,
}

impl FromStr for VerificationFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "verified" => Ok(Self::Verified),
            "unverified" => Ok(Self::Unverified),
            other => Err(format!("unknown verification status: {}", other)),
        }
    }
}

/// Sort key. Each has a natural direction: name A→Z, verified first,
/// nearest first, highest rating first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Name,
    Verified,
    Distance,
    Rating,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "verified" => Ok(Self::Verified),
            "distance" => Ok(Self::Distance),
            "rating" => Ok(Self::Rating),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

/// `Asc` keeps the key's natural direction, `Desc` reverses it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

/// Filter, sort and page parameters for `get_all`
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyQuery {
    pub search: Option<String>,
    pub sectors: Vec<String>,
    pub company_type: Option<CompanyType>,
    pub verification_status: Option<VerificationFilter>,
    pub state: Option<StateCode>,
    pub ownership: Vec<String>,
    pub sort_by: Option<SortKey>,
    pub sort_order: SortOrder,
    /// Reference point for the distance sort
    pub origin: Option<GeoPoint>,
    /// 1-indexed
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl CompanyQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sectors.push(sector.into());
        self
    }

    pub fn with_state(mut self, state: StateCode) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_sort(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort_by = Some(key);
        self.sort_order = order;
        self
    }

    pub fn with_page(mut self, page: usize, limit: usize) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Manual company creation
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCompanyCommand {
    pub name: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub key_sectors: Vec<String>,
    pub capabilities: Vec<String>,
    pub company_type: Option<CompanyType>,
    pub profile: Option<CompanyProfile>,
}

// =============================================================================
// Views (Read Models)
// =============================================================================

/// Paged result envelope
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    /// Post-filter, pre-page count
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub has_more: bool,
}

/// Capped search result; `total` is the uncapped match count
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub data: Vec<Company>,
    pub total: usize,
}

/// Company with derived detail fields
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub capabilities_by_sector: BTreeMap<String, Vec<String>>,
    pub sector_count: usize,
    pub capability_count: usize,
}

impl CompanyDetail {
    pub fn from_company(company: Company) -> Self {
        let mut by_sector: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for record in company.icn_capabilities() {
            let (Some(sector), Some(name)) = (record.sector_name.as_deref(), record.display_name()) else {
                continue;
            };
            let entry = by_sector.entry(sector.to_string()).or_default();
            if !entry.iter().any(|n| n == name) {
                entry.push(name.to_string());
            }
        }

        Self {
            sector_count: company.key_sectors().len(),
            capability_count: company.capabilities().len(),
            capabilities_by_sector: by_sector,
            company,
        }
    }
}

/// Result of a successful delete
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReceipt {
    pub success: bool,
    pub id: EntityId,
}

/// Count for one sector
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorCount {
    pub sector: String,
    pub companies: usize,
}

/// Directory-wide counts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStats {
    pub total: usize,
    pub verified: usize,
    pub unverified: usize,
    pub by_state: BTreeMap<String, usize>,
    pub by_type: BTreeMap<String, usize>,
    pub top_sectors: Vec<SectorCount>,
}

/// Distinct values available to filter on
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub sectors: Vec<String>,
    pub states: Vec<StateCode>,
    pub company_types: Vec<CompanyType>,
    pub ownership: Vec<String>,
}

impl fmt::Display for DirectoryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} companies ({} verified, {} unverified)",
            self.total, self.verified, self.unverified
        )
    }
}
