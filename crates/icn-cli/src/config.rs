//! CLI Configuration

use anyhow::{anyhow, Context};
use icn_directory::DirectoryConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_format: Option<String>,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: Option<String>,
    pub directory: DirectoryConfig,
}

impl Config {
    /// Load from an explicit file, or from the profile's file under the home
    /// directory. A missing profile file yields the defaults.
    pub fn load(explicit: Option<&Path>, profile: Option<&str>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::config_path(profile)?;
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };
        let content = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn save(&self, profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(path)
    }

    pub fn config_path(profile: Option<&str>) -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot find home directory"))?;
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(home.join(".icn-navigator").join(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config = Config::parse(
            r#"
            log_level = "debug"

            [directory]
            dataset_path = "data/icn.json"
            enrich_demo_data = true
            default_page_size = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.directory.dataset_path, Some(PathBuf::from("data/icn.json")));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.directory.enrich_demo_data);
        assert_eq!(config.directory.default_page_size, 10);
        assert_eq!(config.directory.search_result_cap, 50);
    }

    #[test]
    fn test_profile_file_name() {
        let path = Config::config_path(Some("demo")).unwrap();
        assert!(path.ends_with(".icn-navigator/config.demo.toml"));
    }
}
