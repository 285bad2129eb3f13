//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.salarydash.toml` files.

use crate::analysis::{SortColumn, SortOrder};
use crate::cli::{Args, OutputFormat};
use crate::client::ClientConfig;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".salarydash.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Salary API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Rendering settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Salary API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the salary endpoints.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Parallel requests when drilling into several years.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_base_url() -> String {
    ClientConfig::default().base_url
}

fn default_timeout() -> u64 {
    ClientConfig::default().timeout_seconds
}

fn default_concurrency() -> usize {
    4
}

/// Rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Column the yearly table is sorted by.
    #[serde(default)]
    pub sort: SortColumn,

    #[serde(default)]
    pub order: SortOrder,

    /// Rows per drill-down page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            sort: SortColumn::default(),
            order: SortOrder::default(),
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    10
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.salarydash.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    fn validate(&self) -> Result<()> {
        if self.display.page_size == 0 {
            bail!("display.page_size must be at least 1");
        }
        if self.api.timeout_seconds == 0 {
            bail!("api.timeout_seconds must be at least 1");
        }
        if self.api.concurrency == 0 {
            bail!("api.concurrency must be at least 1");
        }
        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments (and their environment variables) take precedence over
    /// config file settings, but only when they were actually given.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref url) = args.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }
        if let Some(concurrency) = args.concurrency {
            self.api.concurrency = concurrency;
        }

        if let Some(format) = args.format {
            self.display.format = format;
        }
        if let Some(sort) = args.sort {
            self.display.sort = sort;
        }
        if let Some(order) = args.order {
            self.display.order = order;
        }
        if let Some(page_size) = args.page_size {
            self.display.page_size = page_size;
        }
    }

    /// Client settings derived from the `[api]` section.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            timeout_seconds: self.api.timeout_seconds,
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
