//! Geocoder backed by a fixed table of answers.
//!
//! Used by tests and by the binary's offline mode. Fixture files are JSON
//! objects mapping a query to `[latitude, longitude]`:
//!
//! ```json
//! { "Warszawa Centralna, Warszawa, Polska": [52.2288, 21.0034] }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::domain::Coordinates;

use super::error::GeocodeError;
use super::{Geocoder, normalize_query};

/// Geocoder answering from an in-memory table.
///
/// Queries are matched after normalization (trimmed, lowercased). Queries
/// registered with [`with_failure`](Self::with_failure) fail as if the
/// service were unreachable.
#[derive(Debug, Default)]
pub struct FixtureGeocoder {
    places: HashMap<String, Coordinates>,
    failing: HashSet<String>,
    calls: AtomicUsize,
    last_timeout: Mutex<Option<Duration>>,
}

impl FixtureGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `coordinates`.
    pub fn with_place(mut self, query: &str, coordinates: Coordinates) -> Self {
        self.places.insert(normalize_query(query), coordinates);
        self
    }

    /// Fail every lookup of `query`.
    pub fn with_failure(mut self, query: &str) -> Self {
        self.failing.insert(normalize_query(query));
        self
    }

    /// Load answers from a JSON fixture file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GeocodeError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| GeocodeError::Fixture {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_json(&json)
    }

    /// Parse answers from a JSON fixture string.
    pub fn from_json(json: &str) -> Result<Self, GeocodeError> {
        let table: HashMap<String, (f64, f64)> =
            serde_json::from_str(json).map_err(|e| GeocodeError::Fixture {
                message: e.to_string(),
            })?;

        Ok(table
            .into_iter()
            .fold(Self::new(), |fixture, (query, (lat, lon))| {
                fixture.with_place(&query, Coordinates::new(lat, lon))
            }))
    }

    /// Number of lookups served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Timeout passed with the most recent lookup.
    pub fn last_timeout(&self) -> Option<Duration> {
        *self.last_timeout.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

impl Geocoder for FixtureGeocoder {
    async fn geocode(
        &self,
        query: &str,
        timeout: Duration,
    ) -> Result<Option<Coordinates>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        *self.last_timeout.lock().unwrap_or_else(|e| e.into_inner()) = Some(timeout);
        let key = normalize_query(query);

        if self.failing.contains(&key) {
            return Err(GeocodeError::Unavailable(format!(
                "no route to geocoder for {query:?}"
            )));
        }

        Ok(self.places.get(&key).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn answers_known_queries_case_insensitively() {
        let fixture = FixtureGeocoder::new()
            .with_place("Gdynia Główna, Polska", Coordinates::new(54.52, 18.53));

        let hit = fixture.geocode("GDYNIA GŁÓWNA, POLSKA", TIMEOUT).await.unwrap();
        let miss = fixture.geocode("Gdańsk", TIMEOUT).await.unwrap();

        assert_eq!(hit, Some(Coordinates::new(54.52, 18.53)));
        assert_eq!(miss, None);
        assert_eq!(fixture.calls(), 2);
    }

    #[tokio::test]
    async fn records_last_timeout() {
        let fixture = FixtureGeocoder::new();
        assert_eq!(fixture.last_timeout(), None);

        fixture.geocode("a", TIMEOUT).await.unwrap();
        fixture.geocode("b", Duration::from_millis(250)).await.unwrap();

        assert_eq!(fixture.last_timeout(), Some(Duration::from_millis(250)));
    }

    #[tokio::test]
    async fn failing_queries_error() {
        let fixture = FixtureGeocoder::new().with_failure("down");
        let err = fixture.geocode("down", TIMEOUT).await.unwrap_err();
        assert!(matches!(err, GeocodeError::Unavailable(_)));
    }

    #[tokio::test]
    async fn loads_fixture_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("places.json");
        std::fs::write(
            &path,
            r#"{
                "Central, Warszawa, Polska": [52.2288, 21.0034],
                "Poznań Główny, Polska": [52.40, 16.91]
            }"#,
        )
        .unwrap();

        let fixture = FixtureGeocoder::from_json_file(&path).unwrap();

        assert_eq!(fixture.len(), 2);
        let hit = fixture.geocode("central, warszawa, polska", TIMEOUT).await.unwrap();
        assert_eq!(hit, Some(Coordinates::new(52.2288, 21.0034)));
    }

    #[test]
    fn missing_file_is_a_fixture_error() {
        let err = FixtureGeocoder::from_json_file("/nonexistent/places.json").unwrap_err();
        assert!(matches!(err, GeocodeError::Fixture { .. }));
    }

    #[test]
    fn malformed_fixture_is_rejected() {
        let err = FixtureGeocoder::from_json(r#"{"Central": "here"}"#).unwrap_err();
        assert!(matches!(err, GeocodeError::Fixture { .. }));
    }
}
