use config::Config;
use serde::Deserialize;

use crate::error::Result;
use crate::query::{SortBy, SortDir};

/// Path of the search endpoint, relative to the base URL
pub const SEARCH_PATH: &str = "/api/rainfall/search";

/// Path of the OpenAPI document probed as a liveness check
pub const API_DOCS_PATH: &str = "/v3/api-docs";

/// Externally supplied constants for talking to the rainfall API.
///
/// Values come from an optional config file overlaid with `RRD_*`
/// environment variables; anything not supplied falls back to the
/// defaults below.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bound applied to every network call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
    /// Page size of the first fetch, sized to a year of daily records
    #[serde(default = "default_initial_page_size")]
    pub initial_page_size: u32,
    #[serde(default)]
    pub sort_by: SortBy,
    #[serde(default)]
    pub sort_dir: SortDir,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_page_size() -> u32 {
    100
}

fn default_max_page_size() -> u32 {
    1000
}

fn default_initial_page_size() -> u32 {
    365
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            initial_page_size: default_initial_page_size(),
            sort_by: SortBy::default(),
            sort_dir: SortDir::default(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from an optional file overlaid with `RRD_*`
    /// environment variables.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix("RRD"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
