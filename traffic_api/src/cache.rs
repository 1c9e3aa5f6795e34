use std::{collections::HashMap, path::PathBuf};

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use url::Url;

use crate::config::{CacheBackend, CacheConfig};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub body: String,
    pub stored_at: DateTime<Utc>,
}

enum Store {
    Disk(PathBuf),
    Memory(RwLock<HashMap<String, CachedResponse>>),
    Disabled,
}

/// Fixed-expiry response store keyed by request signature. Expired entries are never served
/// and get replaced by the next successful response for the same request.
pub struct RequestCache {
    store: Store,
    expire_after: Duration,
}

impl RequestCache {
    pub fn new(config: &CacheConfig) -> anyhow::Result<RequestCache> {
        let expire_after = i64::try_from(config.expire_after_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .with_context(|| format!("cache expire_after_secs {} is too large", config.expire_after_secs))?;
        let store = match config.backend {
            CacheBackend::Disk => Store::Disk(config.path.clone()),
            CacheBackend::Memory => Store::Memory(RwLock::new(HashMap::new())),
            CacheBackend::Disabled => Store::Disabled,
        };
        Ok(RequestCache { store, expire_after })
    }

    /// Hex md5 of the method and full url, query string included.
    pub fn signature(method: &str, url: &Url) -> String {
        let mut context = md5::Context::new();
        context.consume(method.as_bytes());
        context.consume(b" ");
        context.consume(url.as_str().as_bytes());
        format!("{:x}", context.compute())
    }

    fn is_fresh(&self, entry: &CachedResponse, now: DateTime<Utc>) -> bool {
        now - entry.stored_at < self.expire_after
    }

    pub async fn get(&self, key: &str) -> Option<CachedResponse> {
        let entry = match &self.store {
            Store::Disk(dir) => {
                let path = dir.join(format!("{key}.json"));
                let json = tokio::fs::read_to_string(&path).await.ok()?;
                match serde_json::from_str::<CachedResponse>(&json) {
                    Ok(entry) => entry,
                    Err(e) => {
                        warn!("ignoring unreadable cache entry {}: {e}", path.display());
                        return None;
                    }
                }
            }
            Store::Memory(entries) => entries.read().await.get(key)?.clone(),
            Store::Disabled => return None,
        };
        if self.is_fresh(&entry, Utc::now()) {
            Some(entry)
        } else {
            debug!("cache entry {key} expired");
            self.remove(key).await;
            None
        }
    }

    async fn remove(&self, key: &str) {
        match &self.store {
            Store::Disk(dir) => {
                let path = dir.join(format!("{key}.json"));
                if let Err(e) = tokio::fs::remove_file(&path).await {
                    warn!("could not remove expired cache entry {}: {e}", path.display());
                }
            }
            Store::Memory(entries) => {
                entries.write().await.remove(key);
            }
            Store::Disabled => {}
        }
    }

    pub async fn put(&self, key: &str, response: &CachedResponse) -> anyhow::Result<()> {
        match &self.store {
            Store::Disk(dir) => {
                tokio::fs::create_dir_all(dir)
                    .await
                    .with_context(|| format!("creating cache directory {}", dir.display()))?;
                let path = dir.join(format!("{key}.json"));
                let json = serde_json::to_string(response)?;
                tokio::fs::write(&path, json)
                    .await
                    .with_context(|| format!("writing cache entry {}", path.display()))?;
            }
            Store::Memory(entries) => {
                entries.write().await.insert(key.to_string(), response.clone());
            }
            Store::Disabled => {}
        }
        Ok(())
    }
}
