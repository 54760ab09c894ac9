//! Geocoder error types.

/// Errors a geocoder can report.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// A returned coordinate was not a number
    #[error("invalid coordinate in response: {value}")]
    InvalidCoordinate { value: String },

    /// The service refused the query
    #[error("geocoder unavailable: {0}")]
    Unavailable(String),

    /// Fixture file could not be read or parsed
    #[error("fixture error: {message}")]
    Fixture { message: String },
}
