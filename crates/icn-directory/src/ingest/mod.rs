//! Dataset ingestion
//!
//! Raw records, the company-folding loader and the optional demo enricher.

pub mod enrichment;
pub mod loader;
pub mod records;

pub use enrichment::DemoEnricher;
pub use loader::{normalize_items, DirectoryLoader, LoadReport};
pub use records::{RawItem, RawOrganization};
