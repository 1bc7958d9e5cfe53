//! Member data model

use chrono::{DateTime, Datelike, Utc};
use icn_directory::{CompanyQuery, EntityId};
use icn_entitlements::{ExportFieldSet, Feature, Quota, Tier};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed-in user identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A user's current plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub tier: Tier,
    pub since: DateTime<Utc>,
}

impl Subscription {
    pub fn free() -> Self {
        Self {
            tier: Tier::Free,
            since: Utc::now(),
        }
    }
}

/// Bookmarked company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub company_id: EntityId,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a bookmark add or remove
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkReceipt {
    pub success: bool,
    pub company_id: EntityId,
    /// Bookmarks held after the operation
    pub bookmarks: usize,
}

/// Named, stored company query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub id: String,
    pub name: String,
    pub query: CompanyQuery,
    pub created_at: DateTime<Utc>,
}

impl SavedSearch {
    pub fn new(name: impl Into<String>, query: CompanyQuery) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            query,
            created_at: Utc::now(),
        }
    }
}

/// Export output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    /// Feature that unlocks this format
    pub fn feature(&self) -> Feature {
        match self {
            Self::Csv => Feature::ExportCsv,
            Self::Pdf => Feature::ExportPdf,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }
}

/// Which companies to export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportSelection {
    /// Explicit ids, exported in the given order
    Companies(Vec<EntityId>),
    /// Every match of a query, ignoring its paging
    Query(CompanyQuery),
    /// The caller's bookmarks
    Bookmarks,
}

/// Calendar month bucket for export counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UsageMonth {
    pub year: i32,
    pub month: u32,
}

impl UsageMonth {
    pub fn of(at: DateTime<Utc>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }
}

impl fmt::Display for UsageMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Exports made in one month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportUsage {
    pub month: UsageMonth,
    pub count: usize,
}

/// Usage against the caller's limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub tier: Tier,
    pub bookmarks: usize,
    pub bookmark_limit: Quota,
    pub saved_searches: usize,
    pub saved_search_limit: Quota,
    pub exports_this_month: usize,
    pub export_limit: Quota,
    pub export_fields: ExportFieldSet,
}

/// Summary of a completed export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReceipt {
    pub success: bool,
    pub format: ExportFormat,
    pub filename: String,
    pub rows: usize,
    pub exports_this_month: usize,
    /// `None` when the plan has no export ceiling
    pub remaining: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_usage_month_buckets() {
        let jan = Utc.with_ymd_and_hms(2025, 1, 31, 23, 59, 59).unwrap();
        let feb = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        assert_ne!(UsageMonth::of(jan), UsageMonth::of(feb));
        assert!(UsageMonth::of(jan) < UsageMonth::of(feb));
        assert_eq!(UsageMonth::of(feb).to_string(), "2025-02");
    }

    #[test]
    fn test_export_format_features() {
        assert_eq!(ExportFormat::Csv.feature(), Feature::ExportCsv);
        assert_eq!(ExportFormat::Pdf.feature().minimum_tier(), Tier::Premium);
    }
}
