//! Directory Configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Dataset file (JSON array of item records)
    pub dataset_path: Option<PathBuf>,
    /// Seed for coordinate jitter and demo enrichment
    pub seed: u64,
    /// Attach generated phone/email/rating/ownership fields after load
    pub enrich_demo_data: bool,
    /// Page size when a query does not ask for one
    pub default_page_size: usize,
    /// Maximum rows returned by `search`
    pub search_result_cap: usize,
    /// Simulated backend latency
    pub latency: LatencyConfig,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            seed: 0x1C4_2024,
            enrich_demo_data: false,
            default_page_size: 20,
            search_result_cap: 50,
            latency: LatencyConfig::default(),
        }
    }
}

/// Artificial delay applied before each service call
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    /// Fixed part
    pub base_ms: u64,
    /// Upper bound of the random part
    pub jitter_ms: u64,
}

impl LatencyConfig {
    /// No delay at all
    pub fn is_zero(&self) -> bool {
        self.base_ms == 0 && self.jitter_ms == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DirectoryConfig::default();
        assert_eq!(config.search_result_cap, 50);
        assert_eq!(config.default_page_size, 20);
        assert!(!config.enrich_demo_data);
        assert!(config.latency.is_zero());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: DirectoryConfig =
            serde_json::from_str(r#"{"enrich_demo_data": true, "latency": {"base_ms": 200}}"#).unwrap();
        assert!(config.enrich_demo_data);
        assert_eq!(config.latency.base_ms, 200);
        assert_eq!(config.latency.jitter_ms, 0);
        assert_eq!(config.search_result_cap, 50);
    }
}
