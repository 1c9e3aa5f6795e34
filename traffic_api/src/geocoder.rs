use std::sync::Arc;

use anyhow::bail;
use msgs::Coordinate;
use serde::Deserialize;
use url::Url;

use crate::{client::CachedClient, config::ApiConfig, endpoint_url, parse_base_url};

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    position: Position,
}

#[derive(Deserialize)]
struct Position {
    lat: f64,
    lon: f64,
}

/// Resolves free-text addresses with the TomTom search endpoint, asking for one result.
pub struct Geocoder {
    client: Arc<CachedClient>,
    base_url: Url,
    api_key: String,
}

impl Geocoder {
    pub fn new(config: &ApiConfig, client: Arc<CachedClient>) -> anyhow::Result<Geocoder> {
        Ok(Geocoder {
            client,
            base_url: parse_base_url(&config.tomtom_base_url)?,
            api_key: config.tomtom_api_key.clone(),
        })
    }

    fn search_url(&self, address: &str) -> anyhow::Result<Url> {
        let query = format!("{address}.json");
        let mut url = endpoint_url(&self.base_url, &["search", "2", "search", &query])?;
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("limit", "1");
        Ok(url)
    }

    /// `Ok(None)` when the service answered but found nothing; `Err` when the request failed
    /// or the service refused it.
    pub async fn lookup(&self, address: &str) -> anyhow::Result<Option<Coordinate>> {
        let response = self.client.get(self.search_url(address)?).await?;
        if !response.is_success() {
            bail!("search failed with status {}: {}", response.status, response.body);
        }
        let search: SearchResponse = response.json()?;
        Ok(search
            .results
            .first()
            .map(|result| Coordinate::new(result.position.lat, result.position.lon)))
    }

    /// Like [`Geocoder::lookup`], but every failure is logged and collapses into `None`.
    pub async fn search_location(&self, address: &str) -> Option<Coordinate> {
        match self.lookup(address).await {
            Ok(Some(coordinate)) => Some(coordinate),
            Ok(None) => {
                info!("no search results for {address:?}");
                None
            }
            Err(e) => {
                warn!("search for {address:?} failed: {e:#}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        config::{CacheBackend, CacheConfig},
        test_server::{TestServer, UNREACHABLE_BASE_URL},
    };

    use super::*;

    fn geocoder(base_url: String) -> Geocoder {
        let config = ApiConfig {
            tomtom_api_key: "tt-key".to_string(),
            tomtom_base_url: base_url,
            request_timeout_secs: 5,
            cache: CacheConfig { backend: CacheBackend::Disabled, ..CacheConfig::default() },
        };
        let client = Arc::new(CachedClient::new(&config).unwrap());
        Geocoder::new(&config, client).unwrap()
    }

    #[tokio::test]
    async fn returns_first_result_exactly() {
        let server = TestServer::spawn(
            200,
            json!({ "results": [
                { "position": { "lat": 53.430829, "lon": -2.960830 } },
                { "position": { "lat": 1.0, "lon": 2.0 } },
            ] }),
        );
        let found = geocoder(server.base_url()).search_location("Anfield Road, Liverpool").await;
        assert_eq!(found, Some(Coordinate::new(53.430829, -2.960830)));

        let request = server.last_request();
        assert_eq!(request.path, "/search/2/search/Anfield%20Road,%20Liverpool.json");
        assert_eq!(request.query["key"], "tt-key");
        assert_eq!(request.query["limit"], "1");
    }

    #[tokio::test]
    async fn empty_results_are_absent() {
        let server = TestServer::spawn(200, json!({ "results": [] }));
        let geocoder = geocoder(server.base_url());
        assert_eq!(geocoder.lookup("nowhere").await.unwrap(), None);
        assert_eq!(geocoder.search_location("nowhere").await, None);
    }

    #[tokio::test]
    async fn non_200_is_absent() {
        let server = TestServer::spawn(403, json!({ "errorText": "Developer Inactive" }));
        let geocoder = geocoder(server.base_url());
        assert!(geocoder.lookup("Leeds").await.is_err());
        assert_eq!(geocoder.search_location("Leeds").await, None);
    }

    #[tokio::test]
    async fn unreachable_service_is_absent() {
        let geocoder = geocoder(UNREACHABLE_BASE_URL.to_string());
        assert!(geocoder.lookup("Leeds").await.is_err());
        assert_eq!(geocoder.search_location("Leeds").await, None);
    }

    #[test]
    fn slashes_in_addresses_stay_in_one_segment() {
        let url = geocoder(UNREACHABLE_BASE_URL.to_string()).search_url("Flat 1/2 High St").unwrap();
        assert_eq!(url.path(), "/search/2/search/Flat%201%2F2%20High%20St.json");
    }
}
