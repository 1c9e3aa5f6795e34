use std::path::{Path, PathBuf};

use anyhow::Context;
use msgs::Coordinate;
use serde::{Deserialize, Serialize};
use traffic_api::{ApiConfig, CacheConfig, DEFAULT_TOMTOM_BASE_URL};
use traffic_map::{layers::DEFAULT_MAPBOX_STYLE, TileConfig};

const DEFAULT_PORT: u16 = 9080;
const DEFAULT_DATASET: &str = "collision-2022.csv";
/// Liverpool city centre
const DEFAULT_CENTER: Coordinate = Coordinate::new(53.4084, -2.9916);
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

const TOMTOM_API_KEY_VAR: &str = "TOMTOM_API_KEY";
const MAPBOX_ACCESS_TOKEN_VAR: &str = "MAPBOX_ACCESS_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub port: u16,
    pub collision_dataset: PathBuf,
    /// Where the search and route maps open when no address is given
    pub default_center: Coordinate,
    pub collision_center: Coordinate,
    pub tomtom_api_key: String,
    pub tomtom_base_url: String,
    pub mapbox_access_token: String,
    pub mapbox_style: String,
    pub request_timeout_secs: u64,
    pub cache: CacheConfig,
}

impl Default for DashboardConfig {
    fn default() -> DashboardConfig {
        DashboardConfig {
            port: DEFAULT_PORT,
            collision_dataset: PathBuf::from(DEFAULT_DATASET),
            default_center: DEFAULT_CENTER,
            collision_center: collisions::DEFAULT_CENTER,
            tomtom_api_key: String::new(),
            tomtom_base_url: DEFAULT_TOMTOM_BASE_URL.to_string(),
            mapbox_access_token: String::new(),
            mapbox_style: DEFAULT_MAPBOX_STYLE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache: CacheConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Reads `path` if given, otherwise starts from the defaults. Keys from the environment win
    /// over keys in the file.
    pub fn load(path: Option<&Path>) -> anyhow::Result<DashboardConfig> {
        let mut config = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str::<DashboardConfig>(&json).with_context(|| format!("parsing {}", path.display()))?
            }
            None => DashboardConfig::default(),
        };
        config.apply_env(|name| std::env::var(name).ok());

        if config.tomtom_api_key.is_empty() {
            warn!("no TomTom API key configured ({TOMTOM_API_KEY_VAR}); traffic tiles, search and routing will fail");
        }
        if config.mapbox_access_token.is_empty() {
            warn!("no Mapbox access token configured ({MAPBOX_ACCESS_TOKEN_VAR}); base tiles will be blank");
        }
        Ok(config)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(TOMTOM_API_KEY_VAR).filter(|key| !key.is_empty()) {
            self.tomtom_api_key = key;
        }
        if let Some(token) = lookup(MAPBOX_ACCESS_TOKEN_VAR).filter(|token| !token.is_empty()) {
            self.mapbox_access_token = token;
        }
    }

    pub fn tile_config(&self) -> TileConfig {
        TileConfig {
            mapbox_access_token: self.mapbox_access_token.clone(),
            mapbox_style: self.mapbox_style.clone(),
            tomtom_api_key: self.tomtom_api_key.clone(),
            tomtom_tile_base_url: self.tomtom_base_url.clone(),
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            tomtom_api_key: self.tomtom_api_key.clone(),
            tomtom_base_url: self.tomtom_base_url.clone(),
            request_timeout_secs: self.request_timeout_secs,
            cache: self.cache.clone(),
        }
    }
}
