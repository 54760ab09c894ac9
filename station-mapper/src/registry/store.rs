//! The registry: stations, employees and carriers plus the rules tying them.

use indexmap::IndexMap;
use tracing::debug;

use crate::domain::{
    Coordinates, Dependent, DependentId, DependentKind, EntityRef, Station, StationId,
    ValidationError, place_marker, relabel_marker, remove_marker,
};
use crate::map::{MapSurface, MarkerStyle};
use crate::placement::{dependent_label, dependent_position};

use super::details::EntityDetails;
use super::error::{ReferentialViolation, RegistryError};

/// Result of toggling a dependent's marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerToggle {
    /// The marker was placed at these coordinates.
    Shown(Coordinates),
    /// The marker was removed.
    Hidden,
}

/// Global employee and carrier collections, in display order.
#[derive(Debug, Clone, Default)]
pub(super) struct Dependents {
    pub(super) employees: IndexMap<DependentId, Dependent>,
    pub(super) carriers: IndexMap<DependentId, Dependent>,
}

impl Dependents {
    pub(super) fn of(&self, kind: DependentKind) -> &IndexMap<DependentId, Dependent> {
        match kind {
            DependentKind::Employee => &self.employees,
            DependentKind::Carrier => &self.carriers,
        }
    }

    fn of_mut(&mut self, kind: DependentKind) -> &mut IndexMap<DependentId, Dependent> {
        match kind {
            DependentKind::Employee => &mut self.employees,
            DependentKind::Carrier => &mut self.carriers,
        }
    }

    fn get(&self, id: DependentId) -> Option<&Dependent> {
        self.of(id.kind()).get(&id)
    }

    fn get_mut(&mut self, id: DependentId) -> Option<&mut Dependent> {
        self.of_mut(id.kind()).get_mut(&id)
    }

    fn is_placed(&self, id: DependentId) -> bool {
        self.get(id).is_some_and(|d| d.entity.is_placed())
    }
}

/// Owner of every station, employee and carrier.
///
/// All mutation goes through the methods below, which keep each station's
/// employee and carrier lists in step with the dependents' station
/// references and release markers before anything is dropped. Operations
/// that touch the map take the surface as an argument; the registry never
/// holds on to it.
#[derive(Debug, Clone)]
pub struct Registry {
    pub(super) stations: IndexMap<StationId, Station>,
    pub(super) dependents: Dependents,
    style: MarkerStyle,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_style(MarkerStyle::default())
    }

    /// Create a registry that draws every marker with `style`.
    pub fn with_style(style: MarkerStyle) -> Self {
        Self {
            stations: IndexMap::new(),
            dependents: Dependents::default(),
            style,
            next_id: 1,
        }
    }

    fn allocate(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // ---- queries ----

    pub fn station(&self, id: StationId) -> Option<&Station> {
        self.stations.get(&id)
    }

    #[cfg(test)]
    pub(crate) fn station_mut(&mut self, id: StationId) -> Option<&mut Station> {
        self.stations.get_mut(&id)
    }

    /// Stations in display order.
    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn dependent(&self, id: DependentId) -> Option<&Dependent> {
        self.dependents.get(id)
    }

    /// Employees or carriers in display order.
    pub fn dependents(&self, kind: DependentKind) -> impl Iterator<Item = &Dependent> {
        self.dependents.of(kind).values()
    }

    pub fn dependent_count(&self, kind: DependentKind) -> usize {
        self.dependents.of(kind).len()
    }

    /// Station ids and names for pick lists, in display order.
    pub fn station_choices(&self) -> Vec<(StationId, String)> {
        self.stations
            .values()
            .map(|s| (s.id, s.name().to_string()))
            .collect()
    }

    /// Line shown in employee/carrier listings: name and owning station.
    pub fn dependent_line(&self, dependent: &Dependent) -> Result<String, RegistryError> {
        let station = self.owner(dependent)?;
        Ok(format!("{} [{}]", dependent.name(), station.name()))
    }

    /// The station `dependent` belongs to.
    fn owner(&self, dependent: &Dependent) -> Result<&Station, ReferentialViolation> {
        self.stations
            .get(&dependent.station)
            .ok_or(ReferentialViolation::DanglingStation {
                dependent: dependent.id,
                station: dependent.station,
            })
    }

    /// Number of placed markers in total, stations included.
    pub fn placed_count(&self) -> usize {
        let stations = self.stations.values().filter(|s| s.entity.is_placed());
        let dependents = DependentKind::ALL
            .into_iter()
            .flat_map(|kind| self.dependents.of(kind).values())
            .filter(|d| d.entity.is_placed());
        stations.count() + dependents.count()
    }

    /// Dependents of `station` that currently have a marker.
    pub fn visible_dependents(&self, station: StationId) -> usize {
        self.stations
            .get(&station)
            .map(|s| {
                s.all_dependents()
                    .filter(|id| self.dependents.is_placed(*id))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Placed siblings of `except` at `station`, not counting `except`.
    fn placed_siblings(&self, station: &Station, except: DependentId) -> usize {
        station
            .all_dependents()
            .filter(|id| *id != except && self.dependents.is_placed(*id))
            .count()
    }

    /// Details shown when an entity is selected or its marker clicked.
    pub fn details(&self, target: EntityRef) -> Result<EntityDetails, RegistryError> {
        match target {
            EntityRef::Station(id) => {
                let station = self.stations.get(&id).ok_or(RegistryError::UnknownStation(id))?;
                Ok(EntityDetails::for_station(station))
            }
            EntityRef::Dependent(id) => {
                let dependent = self
                    .dependents
                    .get(id)
                    .ok_or(RegistryError::UnknownDependent(id))?;
                let station = self.owner(dependent)?;
                Ok(EntityDetails::for_dependent(dependent, station))
            }
        }
    }

    // ---- stations ----

    /// Add a station already resolved to `coordinates` and place its marker.
    pub fn insert_station<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        name: &str,
        address: &str,
        coordinates: Coordinates,
    ) -> Result<StationId, RegistryError> {
        ValidationError::require("name", name)?;
        ValidationError::require("address", address)?;

        let id = StationId::new(self.allocate());
        let mut station = Station::new(id, name.to_string(), address.to_string());
        place_marker(
            &mut station.entity,
            map,
            id.into(),
            coordinates,
            name,
            &self.style,
        );
        self.stations.insert(id, station);

        debug!(station = %id, name, "station added");
        Ok(id)
    }

    /// Rename a station in place. No marker is re-placed; the station
    /// marker keeps its handle and only its label changes.
    pub fn rename_station<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        id: StationId,
        name: &str,
    ) -> Result<(), RegistryError> {
        ValidationError::require("name", name)?;
        let station = self
            .stations
            .get_mut(&id)
            .ok_or(RegistryError::UnknownStation(id))?;

        if station.entity.name == name {
            return Ok(());
        }
        station.entity.name = name.to_string();
        relabel_marker(&station.entity, map, name);
        Ok(())
    }

    /// Move a station to a new address already resolved to `coordinates`.
    ///
    /// The station marker is replaced and every dependent that was shown is
    /// laid out again around the new position, in display order.
    pub fn relocate_station<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        id: StationId,
        name: &str,
        address: &str,
        coordinates: Coordinates,
    ) -> Result<(), RegistryError> {
        ValidationError::require("name", name)?;
        ValidationError::require("address", address)?;
        let station = self
            .stations
            .get_mut(&id)
            .ok_or(RegistryError::UnknownStation(id))?;

        station.entity.name = name.to_string();
        station.address = address.to_string();
        place_marker(
            &mut station.entity,
            map,
            id.into(),
            coordinates,
            name,
            &self.style,
        );

        let shown: Vec<DependentId> = station
            .all_dependents()
            .filter(|d| self.dependents.is_placed(*d))
            .collect();

        for dependent in &shown {
            if let Some(d) = self.dependents.get_mut(*dependent) {
                remove_marker(&mut d.entity, map);
            }
        }
        for dependent in shown {
            self.place_dependent(map, dependent)?;
        }

        debug!(station = %id, %coordinates, "station relocated");
        Ok(())
    }

    /// Delete a station with all its employees and carriers.
    ///
    /// Every removed entity's marker is deleted from the map. Returns the
    /// removed station.
    pub fn delete_station<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        id: StationId,
    ) -> Result<Station, RegistryError> {
        let mut station = self
            .stations
            .shift_remove(&id)
            .ok_or(RegistryError::UnknownStation(id))?;

        let mut removed = 0usize;
        for kind in DependentKind::ALL {
            self.dependents.of_mut(kind).retain(|_, dependent| {
                if dependent.station != id {
                    return true;
                }
                remove_marker(&mut dependent.entity, map);
                removed += 1;
                false
            });
        }
        remove_marker(&mut station.entity, map);

        debug!(station = %id, dependents = removed, "station deleted");
        Ok(station)
    }

    // ---- employees and carriers ----

    fn require_dependent_fields(
        kind: DependentKind,
        name: &str,
        attribute: &str,
        station: Option<StationId>,
    ) -> Result<StationId, ValidationError> {
        ValidationError::require("name", name)?;
        ValidationError::require(kind.attribute_label(), attribute)?;
        station.ok_or(ValidationError::NoStation)
    }

    /// Add an employee or carrier to `station`. It starts off the map.
    pub fn create_dependent(
        &mut self,
        kind: DependentKind,
        name: &str,
        attribute: &str,
        station: Option<StationId>,
    ) -> Result<DependentId, RegistryError> {
        let station_id = Self::require_dependent_fields(kind, name, attribute, station)?;
        if !self.stations.contains_key(&station_id) {
            return Err(RegistryError::UnknownStation(station_id));
        }

        let id = DependentId::new(kind, self.allocate());
        let dependent = Dependent::new(id, name.to_string(), attribute.to_string(), station_id);
        self.dependents.of_mut(kind).insert(id, dependent);
        if let Some(station) = self.stations.get_mut(&station_id) {
            station.dependents_mut(kind).push(id);
        }

        debug!(dependent = %id, station = %station_id, "dependent added");
        Ok(id)
    }

    /// Update an employee or carrier, moving it to another station if
    /// `station` differs from its current one.
    ///
    /// A moved dependent that was on the map is placed again around its new
    /// station. A renamed dependent that stays put keeps its marker; only
    /// the label changes.
    pub fn edit_dependent<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        id: DependentId,
        name: &str,
        attribute: &str,
        station: Option<StationId>,
    ) -> Result<(), RegistryError> {
        let new_station = Self::require_dependent_fields(id.kind(), name, attribute, station)?;
        let dependent = self
            .dependents
            .get(id)
            .ok_or(RegistryError::UnknownDependent(id))?;
        let target = self
            .stations
            .get(&new_station)
            .ok_or(RegistryError::UnknownStation(new_station))?;

        let old_station = dependent.station;
        let moved = old_station != new_station;
        let renamed = dependent.entity.name != name;
        let was_placed = dependent.entity.is_placed();

        if moved && was_placed && target.coordinates().is_none() {
            return Err(RegistryError::NoStationLocation {
                station: target.name().to_string(),
            });
        }

        let Some(dependent) = self.dependents.get_mut(id) else {
            return Err(RegistryError::UnknownDependent(id));
        };
        dependent.entity.name = name.to_string();
        dependent.attribute = attribute.to_string();

        if moved {
            dependent.station = new_station;
            remove_marker(&mut dependent.entity, map);

            if let Some(old) = self.stations.get_mut(&old_station) {
                old.dependents_mut(id.kind()).retain(|d| *d != id);
            }
            if let Some(new) = self.stations.get_mut(&new_station) {
                new.dependents_mut(id.kind()).push(id);
            }
            if was_placed {
                self.place_dependent(map, id)?;
            }
            debug!(dependent = %id, from = %old_station, to = %new_station, "dependent reassigned");
        } else if renamed {
            relabel_marker(&dependent.entity, map, &dependent_label(id.kind(), name));
        }

        Ok(())
    }

    /// Delete an employee or carrier, removing its marker if shown.
    pub fn delete_dependent<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        id: DependentId,
    ) -> Result<Dependent, RegistryError> {
        let mut dependent = self
            .dependents
            .of_mut(id.kind())
            .shift_remove(&id)
            .ok_or(RegistryError::UnknownDependent(id))?;

        remove_marker(&mut dependent.entity, map);
        if let Some(station) = self.stations.get_mut(&dependent.station) {
            station.dependents_mut(id.kind()).retain(|d| *d != id);
        }

        debug!(dependent = %id, "dependent deleted");
        Ok(dependent)
    }

    /// Show a dependent next to its station.
    ///
    /// The slot is chosen from the number of siblings already shown; a
    /// marker the dependent already had is replaced. Fails without touching
    /// anything if the station has no coordinates.
    pub fn place_dependent<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        id: DependentId,
    ) -> Result<Coordinates, RegistryError> {
        let dependent = self
            .dependents
            .get(id)
            .ok_or(RegistryError::UnknownDependent(id))?;
        let station = self.owner(dependent)?;
        let anchor = station
            .coordinates()
            .ok_or_else(|| RegistryError::NoStationLocation {
                station: station.name().to_string(),
            })?;

        let visible = self.placed_siblings(station, id);
        let position = dependent_position(anchor, visible);
        let label = dependent_label(id.kind(), dependent.name());

        let Some(dependent) = self.dependents.get_mut(id) else {
            return Err(RegistryError::UnknownDependent(id));
        };
        place_marker(&mut dependent.entity, map, id.into(), position, &label, &self.style);

        debug!(dependent = %id, visible, %position, "dependent placed");
        Ok(position)
    }

    /// Hide a shown dependent or show a hidden one.
    pub fn toggle_marker<M: MapSurface + ?Sized>(
        &mut self,
        map: &mut M,
        id: DependentId,
    ) -> Result<MarkerToggle, RegistryError> {
        let dependent = self
            .dependents
            .get_mut(id)
            .ok_or(RegistryError::UnknownDependent(id))?;

        if remove_marker(&mut dependent.entity, map).is_some() {
            return Ok(MarkerToggle::Hidden);
        }
        self.place_dependent(map, id).map(MarkerToggle::Shown)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
