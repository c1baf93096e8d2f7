//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default OMDb endpoint.
const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Fallback search term used when the search box is empty.
const DEFAULT_QUERY: &str = "star";

/// OMDb list searches return at most 10 hits per page.
const DEFAULT_ITEMS_PER_PAGE: u32 = 10;

/// Top-level application configuration.
///
/// The API key is deliberately not part of this file; it comes from the
/// `OMDB_API_KEY` environment variable.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// API endpoint settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Search behavior settings.
    #[serde(default)]
    pub search: SearchConfig,
}

/// API endpoint configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL for OMDb requests (override mainly for tests).
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Search behavior configuration.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchConfig {
    /// Fallback search term when the search box is empty.
    #[serde(default = "default_query")]
    pub default_query: String,
    /// Hits per list-search page, used to derive the total page count.
    #[serde(default = "default_items_per_page")]
    pub items_per_page: u32,
}

fn default_base_url() -> String {
    String::from(DEFAULT_BASE_URL)
}

fn default_query() -> String {
    String::from(DEFAULT_QUERY)
}

const fn default_items_per_page() -> u32 {
    DEFAULT_ITEMS_PER_PAGE
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_query: default_query(),
            items_per_page: default_items_per_page(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Loads config, writing the default file first when none exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if reading, parsing, or the initial write fails.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            tracing::info!("Wrote default config to {}", path.display());
            return Ok(config);
        }
        Self::load(path)
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }
}
