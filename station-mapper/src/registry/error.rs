//! Registry error types.

use crate::domain::{DependentId, StationId, ValidationError};

/// Errors returned by registry and network operations.
///
/// Every operation that returns one of these has left the registry and the
/// map exactly as they were.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    /// Required input missing
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No station with this id
    #[error("unknown station: {0}")]
    UnknownStation(StationId),

    /// No employee or carrier with this id
    #[error("unknown dependent: {0}")]
    UnknownDependent(DependentId),

    /// The owning station has no coordinates to place a dependent around
    #[error("station '{station}' has no location on the map")]
    NoStationLocation { station: String },

    /// The geocoder found nothing for the query
    #[error("could not locate: {query}")]
    GeocodeNotFound { query: String },

    /// The geocoder failed
    #[error("geocoding failed for {query}: {message}")]
    GeocodeFailed { query: String, message: String },

    /// Internal invariant broken; indicates a bug
    #[error("registry inconsistency: {0}")]
    Inconsistent(#[from] ReferentialViolation),
}

/// A broken link between stations and their dependents.
///
/// Never produced by a correct registry; [`check_consistency`] reports it
/// so tests can fail fast.
///
/// [`check_consistency`]: super::Registry::check_consistency
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReferentialViolation {
    #[error("{dependent} refers to missing {station}")]
    DanglingStation {
        dependent: DependentId,
        station: StationId,
    },

    #[error("{dependent} is not listed by its {station}")]
    MissingFromStation {
        dependent: DependentId,
        station: StationId,
    },

    #[error("{station} lists {dependent}, which does not belong to it")]
    ForeignInStation {
        station: StationId,
        dependent: DependentId,
    },

    #[error("{station} lists {dependent} more than once")]
    DuplicateInStation {
        station: StationId,
        dependent: DependentId,
    },

    #[error("{0} is stored under the wrong key or collection")]
    Misfiled(DependentId),

    #[error("{0} is stored under the wrong key")]
    MisfiledStation(StationId),

    #[error("{0} has no marker")]
    StationUnplaced(StationId),

    /// The map holds a different number of markers than the registry placed
    #[error("{placed} entities placed but {on_map} markers on the map")]
    MarkerCount { placed: usize, on_map: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DependentKind;

    #[test]
    fn error_display() {
        let err = RegistryError::from(ValidationError::EmptyField("name"));
        assert_eq!(err.to_string(), "name must not be empty");

        let err = RegistryError::UnknownStation(StationId::new(4));
        assert_eq!(err.to_string(), "unknown station: station#4");

        let err = RegistryError::UnknownDependent(DependentId::new(DependentKind::Employee, 2));
        assert_eq!(err.to_string(), "unknown dependent: employee#2");

        let err = RegistryError::NoStationLocation {
            station: "Central".into(),
        };
        assert_eq!(err.to_string(), "station 'Central' has no location on the map");

        let err = RegistryError::GeocodeNotFound {
            query: "Central, Atlantis".into(),
        };
        assert_eq!(err.to_string(), "could not locate: Central, Atlantis");
    }

    #[test]
    fn violation_display() {
        let err = ReferentialViolation::DanglingStation {
            dependent: DependentId::new(DependentKind::Carrier, 1),
            station: StationId::new(9),
        };
        assert_eq!(err.to_string(), "carrier#1 refers to missing station#9");
    }
}
