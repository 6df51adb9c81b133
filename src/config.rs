//! Configuration management for places-client.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority, `places_inspect` only)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PlacesError, Result};

/// Default Socrata views endpoint hosting the PLACES datasets
pub const DEFAULT_BASE_URL: &str = "https://data.cdc.gov/api/v3/views/";

/// Command-line arguments for places_inspect
#[derive(Parser, Debug)]
#[command(name = "places_inspect")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Release to fetch (2020 through 2025)
    #[arg(default_value = "2025")]
    pub release: String,

    /// Base URL of the Socrata views API
    #[arg(long, env = "PLACES_BASE_URL")]
    pub base_url: Option<String>,

    /// Socrata application token sent as X-App-Token
    #[arg(long, env = "PLACES_APP_TOKEN")]
    pub app_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "PLACES_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Number of rows requested per page
    #[arg(long, env = "PLACES_PAGE_SIZE")]
    pub page_size: Option<usize>,

    /// Stop fetching after this many rows
    #[arg(long)]
    pub max_records: Option<usize>,

    /// Two measure ids or names to correlate, e.g. --correlate LPA,DEPRESSION
    #[arg(long, value_delimiter = ',')]
    pub correlate: Option<Vec<String>>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "PLACES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PLACES_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// API connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the views API; dataset ids are appended to it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional Socrata application token
    #[serde(default)]
    pub app_token: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Rows requested per page ($limit)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Upper bound on rows fetched for one dataset (None = everything)
    #[serde(default)]
    pub max_records: Option<usize>,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from an optional JSON file, then apply environment overrides
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            let json_config = Self::load_from_file(path)?;
            config.merge(json_config);
        }

        config.apply_env(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Load configuration from command-line arguments, with env and file layers underneath
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = Self::load(args.config.as_deref())?;

        if let Some(base_url) = &args.base_url {
            config.api.base_url = base_url.clone();
        }
        if args.app_token.is_some() {
            config.api.app_token = args.app_token.clone();
        }
        if let Some(timeout_secs) = args.timeout_secs {
            config.api.timeout_secs = timeout_secs;
        }
        if let Some(page_size) = args.page_size {
            config.api.page_size = page_size;
        }
        if args.max_records.is_some() {
            config.api.max_records = args.max_records;
        }
        if let Some(log_level) = &args.log_level {
            config.log_level = log_level.clone();
        }

        Ok(config)
    }

    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.api.base_url = other.api.base_url;
        if other.api.app_token.is_some() {
            self.api.app_token = other.api.app_token;
        }
        self.api.timeout_secs = other.api.timeout_secs;
        self.api.page_size = other.api.page_size;
        if other.api.max_records.is_some() {
            self.api.max_records = other.api.max_records;
        }
        self.api.user_agent = other.api.user_agent;
        self.log_level = other.log_level;
    }

    /// Apply `PLACES_*` environment overrides read through `lookup`
    fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup("PLACES_BASE_URL") {
            self.api.base_url = base_url;
        }
        if let Some(token) = lookup("PLACES_APP_TOKEN") {
            self.api.app_token = Some(token);
        }
        if let Some(timeout) = lookup("PLACES_TIMEOUT_SECS") {
            self.api.timeout_secs = parse_env_number("PLACES_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(page_size) = lookup("PLACES_PAGE_SIZE") {
            self.api.page_size = parse_env_number("PLACES_PAGE_SIZE", &page_size)?;
        }
        if let Some(level) = lookup("PLACES_LOG_LEVEL") {
            self.log_level = level;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.api.validate()?;

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(PlacesError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        Ok(())
    }
}

impl ApiConfig {
    /// Validate the API settings
    pub fn validate(&self) -> Result<()> {
        let base_url = &self.base_url;
        if base_url.is_empty() {
            return Err(PlacesError::Config {
                message: "Base URL cannot be empty".to_string(),
            });
        }

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(PlacesError::Config {
                message: format!("Base URL must use http or https: {}", base_url),
            });
        }

        // Dataset ids are appended directly
        if !base_url.ends_with('/') {
            return Err(PlacesError::Config {
                message: format!("Base URL must end with '/': {}", base_url),
            });
        }

        if self.timeout_secs == 0 {
            return Err(PlacesError::Config {
                message: "Timeout cannot be 0".to_string(),
            });
        }

        if self.page_size == 0 {
            return Err(PlacesError::Config {
                message: "Page size cannot be 0".to_string(),
            });
        }

        Ok(())
    }
}

fn parse_env_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| PlacesError::Config {
        message: format!("{} must be a non-negative integer, got {:?}", key, value),
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            app_token: None,
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
            max_records: None,
            user_agent: default_user_agent(),
        }
    }
}

// Default value functions for serde
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    50_000
}

fn default_user_agent() -> String {
    format!("places-client/{}", env!("CARGO_PKG_VERSION"))
}

fn default_log_level() -> String {
    "info".to_string()
}
