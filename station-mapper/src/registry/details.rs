//! Per-entity details shown on selection or marker click.

use std::fmt;

use serde::Serialize;

use crate::domain::{Coordinates, Dependent, DependentKind, Station};

/// What a details view shows for one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EntityDetails {
    Station {
        name: String,
        address: String,
        coordinates: Option<Coordinates>,
        employees: usize,
        carriers: usize,
    },
    Dependent {
        kind: DependentKind,
        name: String,
        attribute_label: &'static str,
        attribute: String,
        station_name: String,
        station_address: String,
    },
}

impl EntityDetails {
    pub(super) fn for_station(station: &Station) -> Self {
        EntityDetails::Station {
            name: station.name().to_string(),
            address: station.address().to_string(),
            coordinates: station.coordinates(),
            employees: station.dependents(DependentKind::Employee).len(),
            carriers: station.dependents(DependentKind::Carrier).len(),
        }
    }

    pub(super) fn for_dependent(dependent: &Dependent, station: &Station) -> Self {
        EntityDetails::Dependent {
            kind: dependent.kind(),
            name: dependent.name().to_string(),
            attribute_label: dependent.kind().attribute_label(),
            attribute: dependent.attribute().to_string(),
            station_name: station.name().to_string(),
            station_address: station.address().to_string(),
        }
    }

    /// Title for a details dialog.
    pub fn title(&self) -> &'static str {
        match self {
            EntityDetails::Station { .. } => "Station details",
            EntityDetails::Dependent {
                kind: DependentKind::Employee,
                ..
            } => "Employee details",
            EntityDetails::Dependent {
                kind: DependentKind::Carrier,
                ..
            } => "Carrier details",
        }
    }
}

impl fmt::Display for EntityDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityDetails::Station {
                name,
                address,
                coordinates,
                employees,
                carriers,
            } => {
                writeln!(f, "Name: {name}")?;
                writeln!(f, "Address: {address}")?;
                writeln!(f)?;
                match coordinates {
                    Some(c) => writeln!(f, "Coordinates: {c}")?,
                    None => writeln!(f, "Coordinates: none")?,
                }
                writeln!(f, "Employees: {employees}")?;
                write!(f, "Carriers: {carriers}")
            }
            EntityDetails::Dependent {
                name,
                attribute_label,
                attribute,
                station_name,
                station_address,
                ..
            } => {
                writeln!(f, "Name: {name}")?;
                let mut label = attribute_label.to_string();
                if let Some(first) = label.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                writeln!(f, "{label}: {attribute}")?;
                writeln!(f)?;
                writeln!(f, "Home station: {station_name}")?;
                write!(f, "({station_address})")
            }
        }
    }
}
