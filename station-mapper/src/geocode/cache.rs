//! In-memory cache in front of a geocoder.
//!
//! Station addresses are looked up again whenever a station is edited, and
//! public geocoders rate-limit hard, so answers are kept for a while. Both
//! hits and "not found" are cached; errors never are.

use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::Coordinates;

use super::error::GeocodeError;
use super::{Geocoder, normalize_query};

/// Configuration for the geocode cache.
#[derive(Debug, Clone)]
pub struct GeocodeCacheConfig {
    /// TTL for cached answers.
    pub ttl: Duration,

    /// Maximum number of cached queries.
    pub max_capacity: u64,
}

impl Default for GeocodeCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
            max_capacity: 1000,
        }
    }
}

/// Geocoder wrapper that caches answers by normalized query.
pub struct CachedGeocoder<G> {
    inner: G,
    cache: MokaCache<String, Option<Coordinates>>,
}

impl<G> CachedGeocoder<G> {
    pub fn new(inner: G, config: &GeocodeCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, cache }
    }

    /// Access the wrapped geocoder.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

impl<G: Geocoder + Sync> Geocoder for CachedGeocoder<G> {
    async fn geocode(
        &self,
        query: &str,
        timeout: Duration,
    ) -> Result<Option<Coordinates>, GeocodeError> {
        let key = normalize_query(query);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(query, "geocode cache hit");
            return Ok(cached);
        }

        let answer = self.inner.geocode(query, timeout).await?;
        self.cache.insert(key, answer).await;

        Ok(answer)
    }
}
