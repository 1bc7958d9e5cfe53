//! Tier, Feature and Limit enumerations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Subscription tier, ordered from least to most privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Default tier for every user without a paid subscription
    #[default]
    Free,
    /// Mid tier
    Plus,
    /// Top tier, unlimited usage
    Premium,
}

impl Tier {
    /// All tiers in ascending order
    pub const ALL: [Tier; 3] = [Tier::Free, Tier::Plus, Tier::Premium];

    /// Wire name of the tier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Plus => "plus",
            Self::Premium => "premium",
        }
    }

    /// Human readable plan name used in upgrade prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Plus => "Plus",
            Self::Premium => "Premium",
        }
    }

    /// Parse a caller-supplied tier string. Matching is case-sensitive and
    /// anything unrecognized falls back to [`Tier::Free`].
    pub fn from_str_lenient(s: &str) -> Self {
        s.parse().unwrap_or(Tier::Free)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = EntitlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Self::Free),
            "plus" => Ok(Self::Plus),
            "premium" => Ok(Self::Premium),
            other => Err(EntitlementError::UnknownTier(other.to_string())),
        }
    }
}

/// Feature that can be gated by tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Feature {
    BasicSearch,
    CompanyProfiles,
    Bookmarks,
    MapView,
    AdvancedFilters,
    SavedSearches,
    ExportCsv,
    ContactDetails,
    SearchHistory,
    ExportPdf,
    AnalyticsDashboard,
    ApiAccess,
    PrioritySupport,
}

impl Feature {
    /// Every feature, in matrix order
    pub const ALL: [Feature; 13] = [
        Feature::BasicSearch,
        Feature::CompanyProfiles,
        Feature::Bookmarks,
        Feature::MapView,
        Feature::AdvancedFilters,
        Feature::SavedSearches,
        Feature::ExportCsv,
        Feature::ContactDetails,
        Feature::SearchHistory,
        Feature::ExportPdf,
        Feature::AnalyticsDashboard,
        Feature::ApiAccess,
        Feature::PrioritySupport,
    ];

    /// Lowest tier that grants the feature. Every higher tier grants it too.
    pub fn minimum_tier(&self) -> Tier {
        match self {
            Self::BasicSearch | Self::CompanyProfiles | Self::Bookmarks | Self::MapView => Tier::Free,
            Self::AdvancedFilters
            | Self::SavedSearches
            | Self::ExportCsv
            | Self::ContactDetails
            | Self::SearchHistory => Tier::Plus,
            Self::ExportPdf | Self::AnalyticsDashboard | Self::ApiAccess | Self::PrioritySupport => {
                Tier::Premium
            }
        }
    }

    /// Tiers that grant this feature
    pub fn allowed_tiers(&self) -> Vec<Tier> {
        let min = self.minimum_tier();
        Tier::ALL.into_iter().filter(|t| *t >= min).collect()
    }

    /// Wire name of the feature
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BasicSearch => "basic_search",
            Self::CompanyProfiles => "company_profiles",
            Self::Bookmarks => "bookmarks",
            Self::MapView => "map_view",
            Self::AdvancedFilters => "advanced_filters",
            Self::SavedSearches => "saved_searches",
            Self::ExportCsv => "export_csv",
            Self::ContactDetails => "contact_details",
            Self::SearchHistory => "search_history",
            Self::ExportPdf => "export_pdf",
            Self::AnalyticsDashboard => "analytics_dashboard",
            Self::ApiAccess => "api_access",
            Self::PrioritySupport => "priority_support",
        }
    }

    /// Short label for upgrade prompts
    pub fn label(&self) -> &'static str {
        match self {
            Self::BasicSearch => "Basic search",
            Self::CompanyProfiles => "Company profiles",
            Self::Bookmarks => "Bookmarks",
            Self::MapView => "Map view",
            Self::AdvancedFilters => "Advanced filters",
            Self::SavedSearches => "Saved searches",
            Self::ExportCsv => "CSV export",
            Self::ContactDetails => "Contact details",
            Self::SearchHistory => "Search history",
            Self::ExportPdf => "PDF export",
            Self::AnalyticsDashboard => "Analytics dashboard",
            Self::ApiAccess => "API access",
            Self::PrioritySupport => "Priority support",
        }
    }
}

impl Feature {
    /// Upgrade hint naming the lowest tier with access, e.g. "Plus plan"
    pub fn required_tier_label(&self) -> String {
        format!("{} plan", self.minimum_tier().display_name())
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = EntitlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| EntitlementError::UnknownFeature(s.to_string()))
    }
}

/// Usage counter that a tier may cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum LimitType {
    Bookmarks,
    SavedSearches,
    Exports,
}

impl LimitType {
    /// Every limit type
    pub const ALL: [LimitType; 3] = [LimitType::Bookmarks, LimitType::SavedSearches, LimitType::Exports];

    /// Wire name of the limit
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bookmarks => "bookmarks",
            Self::SavedSearches => "saved_searches",
            Self::Exports => "exports",
        }
    }

    /// Noun used in limit-reached messages
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Bookmarks => "bookmark",
            Self::SavedSearches => "saved search",
            Self::Exports => "export",
        }
    }
}

impl fmt::Display for LimitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LimitType {
    type Err = EntitlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LimitType::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| EntitlementError::UnknownLimit(s.to_string()))
    }
}

/// Entitlement lookup errors, raised by strict name parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[allow(missing_docs)]
pub enum EntitlementError {
    #[error("unknown tier: {0}")]
    UnknownTier(String),
    #[error("unknown feature: {0}")]
    UnknownFeature(String),
    #[error("unknown limit type: {0}")]
    UnknownLimit(String),
}
