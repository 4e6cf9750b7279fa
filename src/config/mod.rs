//! Configuration loading and management

use crate::core::container::ContainerKind;
use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::PathBuf;
use std::time::Duration;

/// Default bounded wait for the initial load
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Default SQLite connection pool size
pub const DEFAULT_POOL_SIZE: u32 = 5;

/// Which durable backend to open
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Process-local, nothing survives a restart
    #[default]
    InMemory,

    /// CSV file with a header row
    Csv { path: PathBuf },

    /// SQLite database through a connection pool (feature `sqlite`)
    Sqlite {
        url: String,
        #[serde(default = "default_pool_size")]
        pool_size: u32,
    },

    /// LMDB environment directory (feature `lmdb`)
    Lmdb { path: PathBuf },
}

fn default_pool_size() -> u32 {
    DEFAULT_POOL_SIZE
}

/// Complete configuration for a record store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Durable backend
    #[serde(default)]
    pub backend: BackendConfig,

    /// Initial container representation
    #[serde(default)]
    pub container: ContainerKind,

    /// Bounded wait applied before every mutation
    #[serde(
        rename = "load_timeout_ms",
        default = "default_load_timeout",
        serialize_with = "serialize_millis",
        deserialize_with = "deserialize_millis"
    )]
    pub load_timeout: Duration,

    /// CSV export migrated into the backend when it starts out empty
    #[serde(default)]
    pub import_csv: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            container: ContainerKind::default(),
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            import_csv: None,
        }
    }
}

fn default_load_timeout() -> Duration {
    DEFAULT_LOAD_TIMEOUT
}

fn serialize_millis<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_millis() as u64)
}

fn deserialize_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}

impl StoreConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Same configuration with a different load timeout
    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    /// Same configuration with a different starting container
    pub fn with_container(mut self, container: ContainerKind) -> Self {
        self.container = container;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();

        assert_eq!(config.backend, BackendConfig::InMemory);
        assert_eq!(config.container, ContainerKind::Sequence);
        assert_eq!(config.load_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_empty_yaml_uses_defaults() {
        let config = StoreConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_full_yaml() {
        let config = StoreConfig::from_yaml_str(
            r#"
backend:
  kind: sqlite
  url: "sqlite://facility_records.db"
container: ordered_dict
load_timeout_ms: 2500
import_csv: data/facilities.csv
"#,
        )
        .unwrap();

        assert_eq!(
            config.backend,
            BackendConfig::Sqlite {
                url: "sqlite://facility_records.db".to_string(),
                pool_size: DEFAULT_POOL_SIZE,
            }
        );
        assert_eq!(config.container, ContainerKind::Map);
        assert_eq!(config.load_timeout, Duration::from_millis(2500));
        assert_eq!(config.import_csv, Some(PathBuf::from("data/facilities.csv")));
    }

    #[test]
    fn test_yaml_serialization() {
        let config = StoreConfig {
            backend: BackendConfig::Csv {
                path: PathBuf::from("records.csv"),
            },
            container: ContainerKind::Set,
            load_timeout: Duration::from_millis(750),
            import_csv: None,
        };
        let yaml = serde_yaml::to_string(&config).unwrap();

        // Should be able to parse it back
        let parsed = StoreConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unknown_container_is_rejected() {
        assert!(StoreConfig::from_yaml_str("container: tree").is_err());
    }
}
