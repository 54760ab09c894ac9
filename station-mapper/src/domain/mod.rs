//! Domain types for the station network.
//!
//! Stations own employees and carriers; every one of them is an [`Entity`]
//! that may be shown on the map. Identifiers are opaque keys handed out by
//! the registry, so dependents refer to their station without borrowing it.

mod coords;
mod entity;
mod error;
mod ids;

pub use coords::Coordinates;
pub use entity::{
    Dependent, Entity, PlacedMarker, Station, place_marker, relabel_marker, remove_marker,
};
pub use error::ValidationError;
pub use ids::{DependentId, DependentKind, EntityRef, StationId};
