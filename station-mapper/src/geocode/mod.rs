//! Address to coordinate resolution.
//!
//! A [`Geocoder`] answers a free-text query with coordinates, "nothing
//! found", or a transport error. The [`Resolver`] sits on top of it: it adds
//! the default country to bare queries, applies the timeout, reports
//! progress, and folds every outcome into a [`Resolution`] so that no
//! geocoder fault escapes as an error.

mod cache;
mod error;
mod fixture;
mod nominatim;
mod resolver;

use std::future::Future;
use std::time::Duration;

use crate::domain::Coordinates;

pub use cache::{CachedGeocoder, GeocodeCacheConfig};
pub use error::GeocodeError;
pub use fixture::FixtureGeocoder;
pub use nominatim::{NominatimClient, NominatimConfig};
pub use resolver::{Resolution, Resolver, ResolverConfig};

/// A coordinate lookup service.
pub trait Geocoder {
    /// Look up `query`, giving up after `timeout`.
    ///
    /// `Ok(None)` means the service answered but found nothing.
    fn geocode(
        &self,
        query: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<Option<Coordinates>, GeocodeError>> + Send;
}

/// The geocoders the binary can be configured with.
pub enum AnyGeocoder {
    /// Live Nominatim lookups behind a cache
    Nominatim(CachedGeocoder<NominatimClient>),
    /// Offline answers from a fixture table
    Fixture(FixtureGeocoder),
}

impl Geocoder for AnyGeocoder {
    async fn geocode(
        &self,
        query: &str,
        timeout: Duration,
    ) -> Result<Option<Coordinates>, GeocodeError> {
        match self {
            AnyGeocoder::Nominatim(g) => g.geocode(query, timeout).await,
            AnyGeocoder::Fixture(g) => g.geocode(query, timeout).await,
        }
    }
}

/// Cache and fixture key for a query: trimmed and lowercased.
pub(crate) fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}
