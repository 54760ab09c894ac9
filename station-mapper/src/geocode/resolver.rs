//! Station address resolution on top of a geocoder.

use std::time::Duration;

use tracing::warn;

use crate::domain::Coordinates;
use crate::status::StatusSink;

use super::Geocoder;

/// How queries are qualified and how long a lookup may take.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Appended to queries that do not name a country.
    pub default_country: String,

    /// Spellings that count as already naming the default country
    /// (matched case-insensitively as substrings).
    pub country_aliases: Vec<String>,

    /// Timeout passed to the geocoder for each lookup.
    pub timeout: Duration,
}

impl ResolverConfig {
    /// Set the default country and the spellings that mean it.
    pub fn with_country(mut self, country: impl Into<String>, aliases: &[&str]) -> Self {
        self.default_country = country.into();
        self.country_aliases = aliases.iter().map(|a| a.to_lowercase()).collect();
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_country: "Polska".to_string(),
            country_aliases: vec!["polska".to_string(), "poland".to_string()],
            timeout: Duration::from_secs(10),
        }
    }
}

/// Outcome of resolving an address.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Found(Coordinates),
    NotFound,
    /// The geocoder failed; carries a human-readable reason.
    Error(String),
}

/// Resolves free-text station addresses to coordinates.
pub struct Resolver<G> {
    geocoder: G,
    config: ResolverConfig,
}

impl<G: Geocoder> Resolver<G> {
    pub fn new(geocoder: G, config: ResolverConfig) -> Self {
        Self { geocoder, config }
    }

    /// Replace the configuration, keeping the geocoder.
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// The query actually sent: `query`, plus the default country unless it
    /// already names it.
    pub fn qualify(&self, query: &str) -> String {
        let lower = query.to_lowercase();
        let names_country = self
            .config
            .country_aliases
            .iter()
            .any(|alias| lower.contains(alias.as_str()));

        if names_country {
            query.to_string()
        } else {
            format!("{}, {}", query, self.config.default_country)
        }
    }

    /// Resolve `query`, reporting progress on `status`.
    pub async fn resolve<S>(&self, query: &str, status: &S) -> Resolution
    where
        S: StatusSink + Sync + ?Sized,
    {
        let query = self.qualify(query);
        status.notify(&format!("Locating: {query}..."));

        match self.geocoder.geocode(&query, self.config.timeout).await {
            Ok(Some(coordinates)) => {
                status.notify("Location found!");
                Resolution::Found(coordinates)
            }
            Ok(None) => {
                status.notify("Location not found.");
                Resolution::NotFound
            }
            Err(e) => {
                warn!(query = %query, error = %e, "geocoding failed");
                let message = e.to_string();
                status.notify(&format!("Network error: {message}"));
                Resolution::Error(message)
            }
        }
    }
}
