//! OpenStreetMap Nominatim client.

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::domain::Coordinates;

use super::Geocoder;
use super::error::GeocodeError;

/// Default base URL of the public Nominatim instance.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// A single search hit. Nominatim sends coordinates as decimal strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Configuration for the Nominatim client.
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Base URL for the API
    pub base_url: String,
    /// User-Agent header; Nominatim's usage policy requires an identifying one
    pub user_agent: String,
    /// Upper bound on any request, in seconds
    pub timeout_secs: u64,
}

impl NominatimConfig {
    /// Create a config for the public instance.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: format!("station_mapper/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (self-hosted instance or testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set a custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the client-wide timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the Nominatim `/search` endpoint.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(config: NominatimConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Geocoder for NominatimClient {
    async fn geocode(
        &self,
        query: &str,
        timeout: Duration,
    ) -> Result<Option<Coordinates>, GeocodeError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[("q", query), ("format", "jsonv2"), ("limit", "1")])
            .timeout(timeout)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let places = parse_places(&body)?;

        match places.into_iter().next() {
            Some(place) => {
                debug!(query, found = ?place.display_name, "nominatim hit");
                place_coordinates(&place).map(Some)
            }
            None => Ok(None),
        }
    }
}

fn parse_places(body: &str) -> Result<Vec<Place>, GeocodeError> {
    serde_json::from_str(body).map_err(|e| GeocodeError::Json {
        message: e.to_string(),
    })
}

fn place_coordinates(place: &Place) -> Result<Coordinates, GeocodeError> {
    let parse = |value: &str| {
        value
            .trim()
            .parse::<f64>()
            .map_err(|_| GeocodeError::InvalidCoordinate {
                value: value.to_string(),
            })
    };
    Ok(Coordinates::new(parse(&place.lat)?, parse(&place.lon)?))
}
