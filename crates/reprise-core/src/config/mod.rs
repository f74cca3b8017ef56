//! Configuration system for reprise.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{RepriseError, RepriseResult};

/// Review store provider type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreProvider {
    /// In-process map. Development, tests, single-node caches.
    #[default]
    Memory,
    /// Embedded SQLite database.
    Sqlite,
}

/// Review store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backing store to create.
    pub provider: StoreProvider,
    /// Database path for file-backed providers; `None` selects an in-memory
    /// database even for the SQLite provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            provider: StoreProvider::Memory,
            path: None,
        }
    }
}

impl StoreConfig {
    /// File-backed SQLite store at the given path.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            provider: StoreProvider::Sqlite,
            path: Some(path.into()),
        }
    }

    /// Default on-disk location: `~/.reprise/reviews.db`.
    pub fn default_sqlite_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".reprise"))
            .unwrap_or_else(|| PathBuf::from(".reprise"))
            .join("reviews.db")
    }
}

/// SM-2 scheduler parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Ease assigned to a key before its first review.
    pub initial_ease: f32,
    /// Floor the ease factor can never drop below.
    pub minimum_ease: f32,
    /// Interval after the first consecutive success.
    pub first_interval_days: u32,
    /// Interval after the second consecutive success.
    pub second_interval_days: u32,
    /// Lifetime lapses at which a record is flagged as a leech.
    pub leech_lapse_threshold: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            initial_ease: 2.5,
            minimum_ease: 1.3,
            first_interval_days: 1,
            second_interval_days: 6,
            leech_lapse_threshold: 4,
        }
    }
}

/// Due-query pagination limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Page size used when the caller passes limit 0.
    pub default_page_size: usize,
    /// Largest page size honored; bigger requests are clamped, not rejected.
    pub max_page_size: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// Main engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Scheduler parameters.
    pub scheduler: SchedulerConfig,
    /// Review store selection.
    pub store: StoreConfig,
    /// Due-query pagination limits.
    pub query: QueryConfig,
}

impl EngineConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> RepriseResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| RepriseError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| RepriseError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| RepriseError::Configuration(e.to_string())),
            _ => Err(RepriseError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Recognized variables: `REPRISE_STORE_PROVIDER` (`memory`/`sqlite`),
    /// `REPRISE_STORE_PATH`, `REPRISE_LEECH_THRESHOLD`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(provider) = std::env::var("REPRISE_STORE_PROVIDER") {
            config.store.provider = match provider.to_lowercase().as_str() {
                "sqlite" => StoreProvider::Sqlite,
                _ => StoreProvider::Memory,
            };
        }
        if let Ok(path) = std::env::var("REPRISE_STORE_PATH") {
            config.store.path = Some(PathBuf::from(path));
        }
        if let Ok(threshold) = std::env::var("REPRISE_LEECH_THRESHOLD") {
            if let Ok(threshold) = threshold.parse() {
                config.scheduler.leech_lapse_threshold = threshold;
            }
        }

        config
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for EngineConfig.
#[derive(Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set scheduler parameters.
    pub fn scheduler(mut self, scheduler: SchedulerConfig) -> Self {
        self.config.scheduler = scheduler;
        self
    }

    /// Set store configuration.
    pub fn store(mut self, store: StoreConfig) -> Self {
        self.config.store = store;
        self
    }

    /// Set pagination limits.
    pub fn query(mut self, query: QueryConfig) -> Self {
        self.config.query = query;
        self
    }

    /// Set the leech lapse threshold.
    pub fn leech_lapse_threshold(mut self, threshold: u32) -> Self {
        self.config.scheduler.leech_lapse_threshold = threshold;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> EngineConfig {
        self.config
    }
}
