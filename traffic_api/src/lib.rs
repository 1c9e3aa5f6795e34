//! Clients for the TomTom search and routing endpoints. Every request goes through
//! [`CachedClient`], which keeps successful responses for a configured window.

#[macro_use]
extern crate log;

pub mod cache;
pub mod client;
pub mod config;
pub mod geocoder;
pub mod router;

#[cfg(test)]
mod test_server;

pub use cache::{CachedResponse, RequestCache};
pub use client::{ApiResponse, CachedClient};
pub use config::{ApiConfig, CacheBackend, CacheConfig, DEFAULT_TOMTOM_BASE_URL};
pub use geocoder::Geocoder;
pub use router::{Route, Router};

use anyhow::{anyhow, Context};
use url::Url;

/// Joins `segments` onto `base`, percent-encoding each one.
pub(crate) fn endpoint_url(base: &Url, segments: &[&str]) -> anyhow::Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| anyhow!("{base} cannot be used as a base url"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

pub(crate) fn parse_base_url(base_url: &str) -> anyhow::Result<Url> {
    Url::parse(base_url).with_context(|| format!("parsing base url {base_url:?}"))
}
