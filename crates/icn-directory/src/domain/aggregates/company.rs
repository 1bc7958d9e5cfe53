//! Company Aggregate
//!
//! A company folded from every capability row that references its
//! organization id.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::services::CompanyClassifier;
use crate::domain::value_objects::{BillingAddress, EntityId, GeoPoint, StateCode};

/// Derived company type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CompanyType {
    #[default]
    Supplier,
    Manufacturer,
    Both,
    Service,
    Consultant,
}

impl CompanyType {
    pub const ALL: [CompanyType; 5] = [
        CompanyType::Supplier,
        CompanyType::Manufacturer,
        CompanyType::Both,
        CompanyType::Service,
        CompanyType::Consultant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Supplier => "supplier",
            Self::Manufacturer => "manufacturer",
            Self::Both => "both",
            Self::Service => "service",
            Self::Consultant => "consultant",
        }
    }
}

impl fmt::Display for CompanyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown company type: {}", s))
    }
}

/// Verification state, derived from the presence of a validation date
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    #[default]
    Unverified,
}

impl VerificationStatus {
    pub fn from_validation_date(date: Option<NaiveDate>) -> Self {
        if date.is_some() {
            Self::Verified
        } else {
            Self::Unverified
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Unverified => "unverified",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a record came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    #[default]
    IcnImport,
    Manual,
}

/// One raw capability row linking the company to an item
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IcnCapability {
    pub capability_id: Option<String>,
    pub item_id: Option<String>,
    pub item_name: Option<String>,
    pub detailed_item_name: Option<String>,
    pub capability_type: Option<String>,
    pub sector_name: Option<String>,
    pub sector_mapping_id: Option<String>,
}

impl IcnCapability {
    /// Display name for the capability list: detailed name, else item name
    pub fn display_name(&self) -> Option<&str> {
        self.detailed_item_name.as_deref().or(self.item_name.as_deref())
    }
}

/// Contact and profile details. Empty unless set manually or generated by
/// the demo enricher.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub certifications: Vec<String>,
    pub employees: Option<u32>,
    pub rating: Option<f32>,
    pub ownership: Vec<String>,
}

/// Shallow patch applied by `update`; `None` leaves a field untouched
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub billing_address: Option<BillingAddress>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub verification_status: Option<VerificationStatus>,
    pub key_sectors: Option<Vec<String>>,
    pub capabilities: Option<Vec<String>>,
    pub company_type: Option<CompanyType>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub certifications: Option<Vec<String>>,
    pub employees: Option<u32>,
    pub rating: Option<f32>,
    pub ownership: Option<Vec<String>>,
}

/// Company aggregate root
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    id: EntityId,
    name: String,
    address: String,
    billing_address: BillingAddress,
    latitude: f64,
    longitude: f64,
    verification_status: VerificationStatus,
    validation_date: Option<NaiveDate>,
    key_sectors: Vec<String>,
    capabilities: Vec<String>,
    capability_types: Vec<String>,
    company_type: CompanyType,
    icn_capabilities: Vec<IcnCapability>,
    data_source: DataSource,
    #[serde(flatten)]
    profile: CompanyProfile,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Company {
    pub const NAME_PLACEHOLDER: &'static str = "Unknown Company";

    /// Seed a company from the first row seen for an organization id
    pub fn imported(
        id: EntityId,
        name: Option<&str>,
        billing_address: BillingAddress,
        location: GeoPoint,
        validation_date: Option<NaiveDate>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.unwrap_or(Self::NAME_PLACEHOLDER).to_string(),
            address: billing_address.single_line(),
            billing_address,
            latitude: location.latitude,
            longitude: location.longitude,
            verification_status: VerificationStatus::from_validation_date(validation_date),
            validation_date,
            key_sectors: vec![],
            capabilities: vec![],
            capability_types: vec![],
            company_type: CompanyType::default(),
            icn_capabilities: vec![],
            data_source: DataSource::IcnImport,
            profile: CompanyProfile::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a manually entered company (fresh id, unverified)
    pub fn manual(
        name: impl Into<String>,
        billing_address: BillingAddress,
        company_type: CompanyType,
    ) -> Self {
        let now = Utc::now();
        let location = billing_address.state.default_location();
        Self {
            id: EntityId::new(),
            name: name.into(),
            address: billing_address.single_line(),
            billing_address,
            latitude: location.latitude,
            longitude: location.longitude,
            verification_status: VerificationStatus::Unverified,
            validation_date: None,
            key_sectors: vec![],
            capabilities: vec![],
            capability_types: vec![],
            company_type,
            icn_capabilities: vec![],
            data_source: DataSource::Manual,
            profile: CompanyProfile::default(),
            created_at: now,
            updated_at: now,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    pub fn id(&self) -> &EntityId { &self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn address(&self) -> &str { &self.address }
    pub fn billing_address(&self) -> &BillingAddress { &self.billing_address }
    pub fn state(&self) -> StateCode { self.billing_address.state }
    pub fn location(&self) -> GeoPoint { GeoPoint::new(self.latitude, self.longitude) }
    pub fn verification_status(&self) -> VerificationStatus { self.verification_status }
    pub fn is_verified(&self) -> bool { self.verification_status == VerificationStatus::Verified }
    pub fn validation_date(&self) -> Option<NaiveDate> { self.validation_date }
    pub fn key_sectors(&self) -> &[String] { &self.key_sectors }
    pub fn capabilities(&self) -> &[String] { &self.capabilities }
    pub fn capability_types(&self) -> &[String] { &self.capability_types }
    pub fn company_type(&self) -> CompanyType { self.company_type }
    pub fn icn_capabilities(&self) -> &[IcnCapability] { &self.icn_capabilities }
    pub fn data_source(&self) -> DataSource { self.data_source }
    pub fn profile(&self) -> &CompanyProfile { &self.profile }
    pub fn rating(&self) -> Option<f32> { self.profile.rating }
    pub fn ownership(&self) -> &[String] { &self.profile.ownership }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    // =========================================================================
    // Business Operations
    // =========================================================================

    /// Fold one capability row into the company. Sector, capability name,
    /// capability type and provenance are appended only if new; the company
    /// type is recomputed from the full accumulated type set.
    pub fn record_capability(&mut self, capability: IcnCapability) {
        if let Some(sector) = capability.sector_name.as_deref() {
            push_unique(&mut self.key_sectors, sector);
        }
        if let Some(name) = capability.display_name() {
            push_unique(&mut self.capabilities, name);
        }
        if let Some(kind) = capability.capability_type.as_deref() {
            push_unique(&mut self.capability_types, kind);
        }
        if !self.icn_capabilities.contains(&capability) {
            self.icn_capabilities.push(capability);
        }
        self.company_type = CompanyClassifier::classify(self.capability_types.iter().map(String::as_str));
    }

    /// Adopt a validation date if none is known yet
    pub fn record_validation_date(&mut self, date: Option<NaiveDate>) {
        if self.validation_date.is_none() && date.is_some() {
            self.validation_date = date;
            self.verification_status = VerificationStatus::Verified;
        }
    }

    pub fn add_sector(&mut self, sector: &str) {
        push_unique(&mut self.key_sectors, sector);
        self.touch();
    }

    pub fn add_capability(&mut self, capability: &str) {
        push_unique(&mut self.capabilities, capability);
        self.touch();
    }

    /// Replace profile details
    pub fn set_profile(&mut self, profile: CompanyProfile) {
        self.profile = profile;
        self.touch();
    }

    /// Move the map pin
    pub fn set_location(&mut self, location: GeoPoint) {
        self.latitude = location.latitude;
        self.longitude = location.longitude;
    }

    /// Shallow merge of the provided fields
    pub fn apply_patch(&mut self, patch: CompanyPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(billing) = patch.billing_address {
            self.address = billing.single_line();
            self.billing_address = billing;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(latitude) = patch.latitude {
            self.latitude = latitude;
        }
        if let Some(longitude) = patch.longitude {
            self.longitude = longitude;
        }
        if let Some(status) = patch.verification_status {
            self.verification_status = status;
        }
        if let Some(sectors) = patch.key_sectors {
            self.key_sectors = dedup(sectors);
        }
        if let Some(capabilities) = patch.capabilities {
            self.capabilities = dedup(capabilities);
        }
        if let Some(company_type) = patch.company_type {
            self.company_type = company_type;
        }
        if patch.phone.is_some() {
            self.profile.phone = patch.phone;
        }
        if patch.email.is_some() {
            self.profile.email = patch.email;
        }
        if patch.website.is_some() {
            self.profile.website = patch.website;
        }
        if let Some(certifications) = patch.certifications {
            self.profile.certifications = certifications;
        }
        if patch.employees.is_some() {
            self.profile.employees = patch.employees;
        }
        if patch.rating.is_some() {
            self.profile.rating = patch.rating;
        }
        if let Some(ownership) = patch.ownership {
            self.profile.ownership = ownership;
        }
        self.touch();
    }

    /// Case-insensitive substring match over name, address, sectors and
    /// capabilities. `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.address.to_lowercase().contains(needle)
            || self.key_sectors.iter().any(|s| s.to_lowercase().contains(needle))
            || self.capabilities.iter().any(|c| c.to_lowercase().contains(needle))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut out = Vec::with_capacity(values.len());
    for value in values {
        push_unique(&mut out, &value);
    }
    out
}
