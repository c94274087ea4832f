//! # Configuration Management Module
//!
//! TOML configuration for the cauldron binary: where the catalog lives, which
//! storage back end keeps the discovery ledger, and how logging is set up.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cauldron::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("cauldron.toml").await?;
//!     println!("Recipes: {}", config.catalog.recipes);
//!
//!     Config::create_default("cauldron.toml").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration File Format
//!
//! ```toml
//! [catalog]
//! recipes = "data/seeds/recipes.json"
//! materials = "data/seeds/materials.json"
//! collation = "stroke"
//!
//! [storage]
//! backend = "sled"
//! path = "data/dex"
//! key = "dex_discovered_v1"
//!
//! [logging]
//! level = "info"
//! file = "cauldron.log"
//! ```
//!
//! Every section is optional; missing sections and fields take the defaults shown above.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;

use crate::alchemy::{
    AlchemyError, CatalogPaths, Collation, JsonFileStore, KeyValueStore, MemoryStore, SledStore,
    DEFAULT_LEDGER_KEY,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Recipe JSON file (required at runtime).
    #[serde(default = "default_recipes_path")]
    pub recipes: String,
    /// Material JSON file. When unset, missing or empty the list is derived from recipes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<String>,
    /// Ordering for derived material lists.
    #[serde(default)]
    pub collation: Collation,
}

fn default_recipes_path() -> String {
    "data/seeds/recipes.json".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            recipes: default_recipes_path(),
            materials: Some("data/seeds/materials.json".to_string()),
            collation: Collation::Stroke,
        }
    }
}

impl CatalogConfig {
    pub fn paths(&self) -> CatalogPaths {
        CatalogPaths {
            recipes: PathBuf::from(&self.recipes),
            materials: self
                .materials
                .as_ref()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            collation: self.collation,
        }
    }
}

/// Storage back end for the discovery ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Sled database directory at `path`.
    #[default]
    Sled,
    /// Single JSON file at `path`.
    File,
    /// Nothing is written; discoveries last for the process only.
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_storage_path")]
    pub path: String,
    /// Fixed key the ledger is stored under.
    #[serde(default = "default_ledger_key")]
    pub key: String,
}

fn default_storage_path() -> String {
    "data/dex".to_string()
}

fn default_ledger_key() -> String {
    DEFAULT_LEDGER_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sled,
            path: default_storage_path(),
            key: default_ledger_key(),
        }
    }
}

impl StorageConfig {
    /// Open the configured store.
    pub fn open_store(&self) -> Result<Box<dyn KeyValueStore>, AlchemyError> {
        Ok(match self.backend {
            StorageBackend::Sled => Box::new(SledStore::open(&self.path)?),
            StorageBackend::File => Box::new(JsonFileStore::new(&self.path)),
            StorageBackend::Memory => Box::new(MemoryStore::new()),
        })
    }

    /// Open the configured store, dropping to memory when it cannot be opened.
    pub fn open_store_or_memory(&self) -> Box<dyn KeyValueStore> {
        match self.open_store() {
            Ok(store) => store,
            Err(e) => {
                log::warn!(
                    "storage {:?} at {} unavailable ({}); discoveries will not be saved",
                    self.backend,
                    self.path,
                    e
                );
                Box::new(MemoryStore::new())
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: Some("cauldron.log".to_string()),
        }
    }
}

impl LoggingConfig {
    /// Parsed level filter; unknown names fall back to `Info`.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Config {
    /// Load configuration from a file
    pub async fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;

        Ok(config)
    }

    /// Create a default configuration file
    pub async fn create_default(path: &str) -> Result<()> {
        let config = Config::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| anyhow!("Failed to serialize default config: {}", e))?;

        fs::write(path, content)
            .await
            .map_err(|e| anyhow!("Failed to write config file {}: {}", path, e))?;

        Ok(())
    }
}
