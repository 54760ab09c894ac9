//! Stations, dependents and their map markers.
//!
//! Every record embeds an [`Entity`] holding the display name and the placed
//! marker. A marker and its coordinates live in one [`PlacedMarker`] value,
//! so an entity can never have coordinates without a handle or the reverse.

use crate::map::{MapSurface, MarkerHandle, MarkerStyle};

use super::coords::Coordinates;
use super::ids::{DependentId, DependentKind, EntityRef, StationId};

/// A marker currently shown on the map surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedMarker {
    pub handle: MarkerHandle,
    pub coordinates: Coordinates,
}

/// Fields shared by stations, employees and carriers.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub(crate) name: String,
    marker: Option<PlacedMarker>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            marker: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn marker(&self) -> Option<&PlacedMarker> {
        self.marker.as_ref()
    }

    pub fn handle(&self) -> Option<MarkerHandle> {
        self.marker.map(|m| m.handle)
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.marker.map(|m| m.coordinates)
    }

    pub fn is_placed(&self) -> bool {
        self.marker.is_some()
    }
}

/// Show `entity` on the map at `coordinates`.
///
/// Any marker the entity already has is deleted first, so an entity never
/// owns more than one marker.
pub fn place_marker<M: MapSurface + ?Sized>(
    entity: &mut Entity,
    map: &mut M,
    target: EntityRef,
    coordinates: Coordinates,
    label: &str,
    style: &MarkerStyle,
) -> MarkerHandle {
    remove_marker(entity, map);
    let handle = map.set_marker(coordinates, label, style, target);
    entity.marker = Some(PlacedMarker {
        handle,
        coordinates,
    });
    handle
}

/// Take `entity` off the map. Returns the marker that was removed, if any.
pub fn remove_marker<M: MapSurface + ?Sized>(
    entity: &mut Entity,
    map: &mut M,
) -> Option<PlacedMarker> {
    let placed = entity.marker.take()?;
    map.delete_marker(placed.handle);
    Some(placed)
}

/// Change the text of `entity`'s marker without moving it.
///
/// The marker keeps its handle. Returns `false` if the entity is not on the
/// map.
pub fn relabel_marker<M: MapSurface + ?Sized>(entity: &Entity, map: &mut M, label: &str) -> bool {
    match entity.handle() {
        Some(handle) => {
            map.set_label(handle, label);
            true
        }
        None => false,
    }
}

/// A railway station.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub(crate) id: StationId,
    pub(crate) entity: Entity,
    pub(crate) address: String,
    pub(crate) employees: Vec<DependentId>,
    pub(crate) carriers: Vec<DependentId>,
}

impl Station {
    pub(crate) fn new(id: StationId, name: String, address: String) -> Self {
        Self {
            id,
            entity: Entity::new(name),
            address,
            employees: Vec::new(),
            carriers: Vec::new(),
        }
    }

    pub fn id(&self) -> StationId {
        self.id
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn name(&self) -> &str {
        self.entity.name()
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.entity.coordinates()
    }

    /// Employees or carriers of this station, in display order.
    pub fn dependents(&self, kind: DependentKind) -> &[DependentId] {
        match kind {
            DependentKind::Employee => &self.employees,
            DependentKind::Carrier => &self.carriers,
        }
    }

    pub(crate) fn dependents_mut(&mut self, kind: DependentKind) -> &mut Vec<DependentId> {
        match kind {
            DependentKind::Employee => &mut self.employees,
            DependentKind::Carrier => &mut self.carriers,
        }
    }

    /// Employees followed by carriers.
    pub fn all_dependents(&self) -> impl Iterator<Item = DependentId> + '_ {
        self.employees.iter().chain(self.carriers.iter()).copied()
    }

    /// Line shown in station listings.
    pub fn display_line(&self) -> String {
        format!("{} ({})", self.name(), self.address)
    }
}

/// An employee or carrier assigned to a station.
///
/// `attribute` is the employee's position or the carrier's fleet type,
/// depending on the kind carried by the id.
#[derive(Debug, Clone, PartialEq)]
pub struct Dependent {
    pub(crate) id: DependentId,
    pub(crate) entity: Entity,
    pub(crate) attribute: String,
    pub(crate) station: StationId,
}

impl Dependent {
    pub(crate) fn new(
        id: DependentId,
        name: String,
        attribute: String,
        station: StationId,
    ) -> Self {
        Self {
            id,
            entity: Entity::new(name),
            attribute,
            station,
        }
    }

    pub fn id(&self) -> DependentId {
        self.id
    }

    pub fn kind(&self) -> DependentKind {
        self.id.kind()
    }

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn name(&self) -> &str {
        self.entity.name()
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The employee's job title, if this is an employee.
    pub fn position(&self) -> Option<&str> {
        (self.kind() == DependentKind::Employee).then_some(self.attribute.as_str())
    }

    /// The carrier's fleet type, if this is a carrier.
    pub fn fleet_type(&self) -> Option<&str> {
        (self.kind() == DependentKind::Carrier).then_some(self.attribute.as_str())
    }

    pub fn station(&self) -> StationId {
        self.station
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.entity.coordinates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::MarkerLayer;

    fn target() -> EntityRef {
        EntityRef::Station(StationId::new(1))
    }

    #[test]
    fn new_entity_is_unplaced() {
        let e = Entity::new("Central");
        assert!(!e.is_placed());
        assert!(e.handle().is_none());
        assert!(e.coordinates().is_none());
    }

    #[test]
    fn place_sets_handle_and_coordinates_together() {
        let mut map = MarkerLayer::new();
        let mut e = Entity::new("Central");
        let at = Coordinates::new(52.0, 21.0);

        let style = MarkerStyle::default();
        let handle = place_marker(&mut e, &mut map, target(), at, "Central", &style);

        assert_eq!(e.handle(), Some(handle));
        assert_eq!(e.coordinates(), Some(at));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(handle).unwrap().label, "Central");
    }

    #[test]
    fn placing_twice_keeps_one_marker_at_latest_position() {
        let mut map = MarkerLayer::new();
        let mut e = Entity::new("Central");
        let style = MarkerStyle::default();

        let (near, far) = (Coordinates::new(1.0, 1.0), Coordinates::new(2.0, 2.0));
        let first = place_marker(&mut e, &mut map, target(), near, "a", &style);
        let second = place_marker(&mut e, &mut map, target(), far, "b", &style);

        assert_ne!(first, second);
        assert_eq!(map.len(), 1);
        assert!(map.get(first).is_none());
        assert_eq!(e.coordinates(), Some(Coordinates::new(2.0, 2.0)));
    }

    #[test]
    fn remove_clears_both() {
        let mut map = MarkerLayer::new();
        let mut e = Entity::new("Central");
        let style = MarkerStyle::default();
        place_marker(&mut e, &mut map, target(), Coordinates::new(1.0, 1.0), "a", &style);

        let removed = remove_marker(&mut e, &mut map);

        assert!(removed.is_some());
        assert!(!e.is_placed());
        assert!(map.is_empty());
        assert!(remove_marker(&mut e, &mut map).is_none());
    }

    #[test]
    fn relabel_keeps_handle() {
        let mut map = MarkerLayer::new();
        let mut e = Entity::new("Central");
        let style = MarkerStyle::default();
        let at = Coordinates::new(52.0, 21.0);
        let handle = place_marker(&mut e, &mut map, target(), at, "Central", &style);

        assert!(relabel_marker(&e, &mut map, "Warszawa Centralna"));

        assert_eq!(e.handle(), Some(handle));
        assert_eq!(map.get(handle).unwrap().label, "Warszawa Centralna");
        assert!(!relabel_marker(&Entity::new("x"), &mut map, "y"));
    }

    #[test]
    fn kind_specific_attribute_accessors() {
        let station = StationId::new(1);
        let emp = Dependent::new(
            DependentId::new(DependentKind::Employee, 1),
            "Anna".into(),
            "Dispatcher".into(),
            station,
        );
        assert_eq!(emp.position(), Some("Dispatcher"));
        assert_eq!(emp.fleet_type(), None);

        let car = Dependent::new(
            DependentId::new(DependentKind::Carrier, 1),
            "PKP Intercity".into(),
            "EMU".into(),
            station,
        );
        assert_eq!(car.fleet_type(), Some("EMU"));
        assert_eq!(car.position(), None);
    }

    #[test]
    fn station_display_line() {
        let s = Station::new(StationId::new(1), "Central".into(), "Warszawa".into());
        assert_eq!(s.display_line(), "Central (Warszawa)");
        assert!(s.dependents(DependentKind::Employee).is_empty());
    }
}
