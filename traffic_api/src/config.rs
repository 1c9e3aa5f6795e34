use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TOMTOM_BASE_URL: &str = "https://api.tomtom.com";
const DEFAULT_CACHE_PATH: &str = "traffic_cache";
const DEFAULT_EXPIRE_AFTER_SECS: u64 = 180;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// One JSON file per request signature under `CacheConfig::path`
    Disk,
    Memory,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub path: PathBuf,
    pub expire_after_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> CacheConfig {
        CacheConfig {
            backend: CacheBackend::Disk,
            path: PathBuf::from(DEFAULT_CACHE_PATH),
            expire_after_secs: DEFAULT_EXPIRE_AFTER_SECS,
        }
    }
}

/// Everything the search and routing clients need. Handed to each constructor instead of
/// living in globals.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub tomtom_api_key: String,
    pub tomtom_base_url: String,
    pub request_timeout_secs: u64,
    pub cache: CacheConfig,
}

impl Default for ApiConfig {
    fn default() -> ApiConfig {
        ApiConfig {
            tomtom_api_key: String::new(),
            tomtom_base_url: DEFAULT_TOMTOM_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache: CacheConfig::default(),
        }
    }
}
