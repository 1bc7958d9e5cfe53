//! ICN Navigator Member Services
//!
//! Per-user state layered over the directory and gated by the entitlement
//! engine: subscriptions, bookmarks, saved searches and exports.
//!
//! ```text
//!  caller (Option<&UserId>)
//!        │
//!        ▼
//!  MemberService ──► has_feature / limit_for ──► MemberStore (per-user maps)
//!        │
//!        └────────► DirectoryUseCases (company lookups, queries)
//! ```

pub mod error;
pub mod export;
pub mod model;
pub mod service;
pub mod store;

pub use error::{MemberError, MemberResult};
pub use export::{CsvExport, ExportArtifact, ReportDocument, ReportEntry, ReportSummary};
pub use model::{
    Bookmark, BookmarkReceipt, ExportFormat, ExportReceipt, ExportSelection, SavedSearch, Subscription,
    UsageMonth, UsageSummary, UserId,
};
pub use service::MemberService;
pub use store::MemberStore;
