//! Catalog configuration
//!
//! ## Configuration Sources (in precedence order)
//!
//! 1. Command-line flags (applied by the shell)
//! 2. `POKEDEX_API_URL` environment variable (base URL only)
//! 3. Config file (`--config` path, else `~/.config/pokedex/config.yaml`)
//! 4. Built-in defaults
//!
//! ```yaml
//! base_url: https://pokeapi.co/api/v2
//! page_size: 20
//! generation_count: 9
//! timeout_seconds: 30
//! max_concurrency: 16
//! fan_out: strict
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CatalogError, Result};

/// Default remote API root
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "POKEDEX_API_URL";

/// How a fan-out treats a failing member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FanOutPolicy {
    /// Any failing member fails the whole batch
    #[default]
    Strict,
    /// Failing members are logged and skipped
    Partial,
}

/// Configuration for the catalog core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Remote API root, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Entries per list page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Number of generation buckets (ids 1..=generation_count)
    #[serde(default = "default_generation_count")]
    pub generation_count: u8,

    /// Per-request HTTP timeout
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Requests in flight per fan-out
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Failure handling for page, generation and evolution fan-outs
    #[serde(default)]
    pub fan_out: FanOutPolicy,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            generation_count: default_generation_count(),
            timeout_seconds: default_timeout(),
            max_concurrency: default_max_concurrency(),
            fan_out: FanOutPolicy::default(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_generation_count() -> u8 {
    9
}

fn default_timeout() -> u64 {
    30
}

fn default_max_concurrency() -> usize {
    16
}

impl CatalogConfig {
    /// Load from the default location, then apply the environment override
    pub fn load() -> Result<Self> {
        let path = Self::default_config_path();
        let mut config = match path {
            Some(path) => Self::load_from_path(&path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Load from a specific path. A missing file yields the defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: CatalogConfig = serde_yaml_ng::from_str(&content)?;
        config.base_url = normalize_base_url(&config.base_url);
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Default config file path (`<config dir>/pokedex/config.yaml`)
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("co", "pokeapi", "pokedex")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .or_else(|| dirs::config_dir().map(|d| d.join("pokedex")))
            .map(|dir| dir.join("config.yaml"))
    }

    /// Apply `POKEDEX_API_URL` if set and non-empty
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = normalize_base_url(&url);
            }
        }
    }

    /// Replace the base URL (CLI flag)
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = normalize_base_url(url);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(CatalogError::Config(format!(
                "base_url must start with http:// or https:// (got '{}')",
                self.base_url
            )));
        }
        if self.page_size == 0 {
            return Err(CatalogError::Config("page_size must be at least 1".into()));
        }
        if self.generation_count == 0 {
            return Err(CatalogError::Config(
                "generation_count must be at least 1".into(),
            ));
        }
        if self.max_concurrency == 0 {
            return Err(CatalogError::Config(
                "max_concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Whether failing fan-out members should be skipped instead of aborting
    pub fn allows_partial(&self) -> bool {
        self.fan_out == FanOutPolicy::Partial
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
