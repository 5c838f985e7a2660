//! Dashboard configuration.
//!
//! Loaded from a TOML file. Every section and field has a default, so an
//! empty or missing file yields a working configuration that runs entirely
//! on the built-in sample data.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "BIOSCIENCE_CATALOG_CONFIG";

/// Environment variable overriding `store.base_url`.
pub const STORE_URL_ENV: &str = "BIOSCIENCE_CATALOG_STORE_URL";

/// Environment variable overriding `store.api_token`.
pub const API_TOKEN_ENV: &str = "BIOSCIENCE_CATALOG_API_TOKEN";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub insights: InsightsConfig,

    #[serde(default)]
    pub project: ProjectConfig,
}

// ── Record store ──────────────────────────────────────────────────────────────

/// Where publications are fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Hosted object store base URL
    #[serde(default)]
    pub base_url: Option<String>,

    /// Bearer token for the hosted store
    #[serde(default)]
    pub api_token: Option<String>,

    /// Collection holding publication records
    #[serde(default = "default_object_type")]
    pub object_type: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Local JSON export used instead of the hosted store
    #[serde(default)]
    pub data_file: Option<PathBuf>,
}

fn default_object_type() -> String { "publications".to_string() }
fn default_timeout_secs() -> u64 { 10 }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_token: None,
            object_type: default_object_type(),
            timeout_secs: default_timeout_secs(),
            data_file: None,
        }
    }
}

// ── Pages ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Records fetched per search
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,

    #[serde(default = "default_true")]
    pub newest_first: bool,
}

fn default_fetch_limit() -> usize { 100 }
fn default_true() -> bool { true }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            fetch_limit: default_fetch_limit(),
            newest_first: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsConfig {
    #[serde(default = "default_fetch_limit")]
    pub fetch_limit: usize,

    #[serde(default = "default_top_keywords")]
    pub top_keywords: usize,

    /// Records listed in the import summary
    #[serde(default = "default_preview_sample_size")]
    pub preview_sample_size: usize,
}

fn default_top_keywords() -> usize { crate::insights::TOP_KEYWORD_LIMIT }
fn default_preview_sample_size() -> usize { 10 }

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            fetch_limit: default_fetch_limit(),
            top_keywords: default_top_keywords(),
            preview_sample_size: default_preview_sample_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Records scanned when looking for related projects
    #[serde(default = "default_related_fetch_limit")]
    pub related_fetch_limit: usize,

    #[serde(default = "default_related_limit")]
    pub related_limit: usize,
}

fn default_related_fetch_limit() -> usize { 10 }
fn default_related_limit() -> usize { 4 }

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            related_fetch_limit: default_related_fetch_limit(),
            related_limit: default_related_limit(),
        }
    }
}

impl DashboardConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration and apply environment overrides.
    ///
    /// Resolution order for the file: `explicit`, then `$BIOSCIENCE_CATALOG_CONFIG`,
    /// then `<config dir>/bioscience-catalog/config.toml`. A missing file is
    /// not an error and yields defaults; an unreadable or invalid one is.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => {
                info!("Loading configuration from {}", path.display());
                let content = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path: path.clone(), source })?;
                Self::from_toml_str(&content)?
            }
            Some(path) => {
                debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(
            std::env::var(STORE_URL_ENV).ok(),
            std::env::var(API_TOKEN_ENV).ok(),
        );
        Ok(config)
    }

    /// Replace store settings with values taken from the environment.
    pub fn apply_overrides(&mut self, store_url: Option<String>, api_token: Option<String>) {
        if let Some(url) = store_url.filter(|u| !u.trim().is_empty()) {
            self.store.base_url = Some(url);
        }
        if let Some(token) = api_token.filter(|t| !t.trim().is_empty()) {
            self.store.api_token = Some(token);
        }
    }
}

/// `<user config dir>/bioscience-catalog/config.toml`, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bioscience-catalog").join("config.toml"))
}
