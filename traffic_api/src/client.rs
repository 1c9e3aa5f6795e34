use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    cache::{CachedResponse, RequestCache},
    config::ApiConfig,
};

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
    pub from_cache: bool,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    pub fn json<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        serde_json::from_str(&self.body).context("parsing response body")
    }
}

/// HTTP client shared by the search and routing clients. Answers from the cache when it can;
/// only 200 responses are stored.
pub struct CachedClient {
    http: reqwest::Client,
    cache: RequestCache,
}

impl CachedClient {
    pub fn new(config: &ApiConfig) -> anyhow::Result<CachedClient> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("building http client")?;
        Ok(CachedClient {
            http,
            cache: RequestCache::new(&config.cache)?,
        })
    }

    pub async fn get(&self, url: Url) -> anyhow::Result<ApiResponse> {
        // The query string carries the api key, so only the path goes into logs and errors.
        let path = url.path().to_string();
        let key = RequestCache::signature("GET", &url);

        if let Some(entry) = self.cache.get(&key).await {
            debug!("cache hit for {path}");
            return Ok(ApiResponse { status: entry.status, body: entry.body, from_cache: true });
        }

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("requesting {path}"))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .with_context(|| format!("reading response from {path}"))?;
        debug!("{path} answered {status}");

        if status == 200 {
            let entry = CachedResponse { status, body: body.clone(), stored_at: Utc::now() };
            if let Err(e) = self.cache.put(&key, &entry).await {
                warn!("could not cache response for {path}: {e:#}");
            }
        }

        Ok(ApiResponse { status, body, from_cache: false })
    }
}
