use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::resolver::DEFAULT_RELEASE_PRIORITY;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Remote card API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Gateway base URL (e.g. "https://cards.example.org")
    pub gateway: String,
    /// Endpoint path on the gateway (e.g. "/api/catalog")
    pub endpoint: String,
    /// Request timeout in seconds, applied per phase call (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl ApiConfig {
    /// Full request URL with exactly one slash at the join.
    pub fn request_url(&self) -> String {
        format!(
            "{}/{}",
            self.gateway.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }
}

fn default_timeout() -> u32 {
    30
}

/// Cache snapshot and staleness configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Where the snapshot JSON document lives
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
    /// Staleness window in seconds (default: 6 hours)
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            refresh_secs: default_refresh_secs(),
        }
    }
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("card-cache.json")
}

fn default_refresh_secs() -> u64 {
    21600
}

/// Query resolution configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Most matches listed by name before a query counts as too broad
    /// (default: 20)
    #[serde(default = "default_max_listing")]
    pub max_listing: usize,
    /// Known release codes, oldest to newest
    #[serde(default = "default_release_priority")]
    pub release_priority: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_listing: default_max_listing(),
            release_priority: default_release_priority(),
        }
    }
}

fn default_max_listing() -> usize {
    20
}

fn default_release_priority() -> Vec<String> {
    DEFAULT_RELEASE_PRIORITY
        .iter()
        .map(|code| code.to_string())
        .collect()
}
