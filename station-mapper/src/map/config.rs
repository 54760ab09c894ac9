//! Map view configuration.

use crate::domain::Coordinates;

/// Initial view and zoom levels used when focusing stations.
#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// Where the map is centred on startup.
    pub home: Coordinates,

    /// Zoom level on startup.
    pub home_zoom: u8,

    /// Zoom applied after a station is created.
    pub created_zoom: u8,

    /// Zoom applied when focusing an existing station.
    pub focus_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            home: Coordinates::new(52.23, 21.01), // Warsaw
            home_zoom: 6,
            created_zoom: 16,
            focus_zoom: 17,
        }
    }
}
