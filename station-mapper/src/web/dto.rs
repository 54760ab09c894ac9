//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinates, Dependent, DependentKind, Station};
use crate::map::{MapView, Marker};
use crate::registry::{EntityDetails, MarkerToggle};

/// Body of station create and edit requests.
#[derive(Debug, Deserialize)]
pub struct StationRequest {
    pub name: String,
    pub address: String,
}

/// Body of employee and carrier create and edit requests.
#[derive(Debug, Deserialize)]
pub struct DependentRequest {
    pub name: String,

    /// Position for employees, fleet type for carriers
    pub attribute: String,

    /// Owning station id
    pub station: Option<u64>,
}

/// A station in listings.
#[derive(Debug, Serialize)]
pub struct StationItem {
    pub id: u64,
    pub name: String,
    pub address: String,
    pub coordinates: Option<Coordinates>,

    /// `"<name> (<address>)"`
    pub line: String,
}

impl StationItem {
    pub fn from_station(station: &Station) -> Self {
        Self {
            id: station.id().get(),
            name: station.name().to_string(),
            address: station.address().to_string(),
            coordinates: station.coordinates(),
            line: station.display_line(),
        }
    }
}

/// An employee or carrier in listings.
#[derive(Debug, Serialize)]
pub struct DependentItem {
    pub id: u64,
    pub kind: DependentKind,
    pub name: String,
    pub attribute: String,
    pub station: u64,

    /// Present while the marker is shown
    pub coordinates: Option<Coordinates>,

    /// `"<name> [<station name>]"`
    pub line: String,
}

impl DependentItem {
    pub fn from_dependent(dependent: &Dependent, line: String) -> Self {
        Self {
            id: dependent.id().seq(),
            kind: dependent.kind(),
            name: dependent.name().to_string(),
            attribute: dependent.attribute().to_string(),
            station: dependent.station().get(),
            coordinates: dependent.coordinates(),
            line,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: u64,
}

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub shown: bool,
    pub coordinates: Option<Coordinates>,
}

impl From<MarkerToggle> for ToggleResponse {
    fn from(toggle: MarkerToggle) -> Self {
        match toggle {
            MarkerToggle::Shown(at) => Self {
                shown: true,
                coordinates: Some(at),
            },
            MarkerToggle::Hidden => Self {
                shown: false,
                coordinates: None,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FocusResponse {
    pub coordinates: Option<Coordinates>,
}

/// Details of one entity, structured and as display text.
#[derive(Debug, Serialize)]
pub struct DetailsResponse {
    pub title: &'static str,
    pub text: String,
    pub details: EntityDetails,
}

impl From<EntityDetails> for DetailsResponse {
    fn from(details: EntityDetails) -> Self {
        Self {
            title: details.title(),
            text: details.to_string(),
            details,
        }
    }
}

/// Everything needed to draw the map.
#[derive(Debug, Serialize)]
pub struct MapResponse {
    pub view: MapView,
    pub markers: Vec<Marker>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub latest: Option<String>,
    pub history: Vec<String>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
