//! The station network service.
//!
//! [`StationNetwork`] ties the registry to a geocoder, the in-memory map and
//! a status sink. Front ends go through it for every command: it geocodes
//! where needed, applies the registry operation, moves the map view and
//! reports the outcome on the status line.

use tracing::{info, warn};

use crate::domain::{
    Coordinates, Dependent, DependentId, DependentKind, EntityRef, Station, StationId,
    ValidationError,
};
use crate::geocode::{Geocoder, Resolution, Resolver, ResolverConfig};
use crate::map::{MapConfig, MapSurface, MarkerLayer};
use crate::registry::{EntityDetails, MarkerToggle, ReferentialViolation, Registry, RegistryError};
use crate::status::{StatusSink, TracingStatus};

/// Stations, employees and carriers together with the services they need.
pub struct StationNetwork<G> {
    registry: Registry,
    resolver: Resolver<G>,
    map: MarkerLayer,
    map_config: MapConfig,
    status: Box<dyn StatusSink + Send + Sync>,
}

impl<G: Geocoder + Sync> StationNetwork<G> {
    /// Create an empty network with default configuration. Status lines go
    /// to the log only until [`with_status`](Self::with_status) is used.
    pub fn new(geocoder: G) -> Self {
        let map_config = MapConfig::default();
        Self {
            registry: Registry::new(),
            resolver: Resolver::new(geocoder, ResolverConfig::default()),
            map: MarkerLayer::with_config(&map_config),
            map_config,
            status: Box::new(TracingStatus),
        }
    }

    pub fn with_resolver_config(mut self, config: ResolverConfig) -> Self {
        self.resolver = self.resolver.with_config(config);
        self
    }

    pub fn with_status(mut self, status: impl StatusSink + Send + Sync + 'static) -> Self {
        self.status = Box::new(status);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn map(&self) -> &MarkerLayer {
        &self.map
    }

    pub fn resolver(&self) -> &Resolver<G> {
        &self.resolver
    }

    fn notify(&self, text: &str) {
        self.status.notify(text);
    }

    /// Geocode `"<name>, <address>"`, turning anything but a hit into an error.
    async fn locate(&self, name: &str, address: &str) -> Result<Coordinates, RegistryError> {
        let query = format!("{name}, {address}");
        match self.resolver.resolve(&query, self.status.as_ref()).await {
            Resolution::Found(coordinates) => Ok(coordinates),
            Resolution::NotFound => Err(RegistryError::GeocodeNotFound {
                query: self.resolver.qualify(&query),
            }),
            Resolution::Error(message) => Err(RegistryError::GeocodeFailed {
                query: self.resolver.qualify(&query),
                message,
            }),
        }
    }

    // ---- stations ----

    /// Geocode and add a station, then centre the map on it.
    ///
    /// Nothing is added if the address cannot be located.
    pub async fn create_station(
        &mut self,
        name: &str,
        address: &str,
    ) -> Result<StationId, RegistryError> {
        ValidationError::require("name", name)?;
        ValidationError::require("address", address)?;

        let coordinates = self.locate(name, address).await?;
        let id = self
            .registry
            .insert_station(&mut self.map, name, address, coordinates)?;
        self.map.set_position(coordinates);
        self.map.set_zoom(self.map_config.created_zoom);

        info!(station = %id, name, %coordinates, "station created");
        Ok(id)
    }

    /// Update a station's name and address.
    ///
    /// A changed address is geocoded again; if that fails the station is
    /// left exactly as it was. Shown employees and carriers follow the
    /// station to its new position.
    pub async fn edit_station(
        &mut self,
        id: StationId,
        name: &str,
        address: &str,
    ) -> Result<(), RegistryError> {
        ValidationError::require("name", name)?;
        ValidationError::require("address", address)?;
        let station = self
            .registry
            .station(id)
            .ok_or(RegistryError::UnknownStation(id))?;

        if station.address() == address {
            self.registry.rename_station(&mut self.map, id, name)?;
        } else {
            let coordinates = self.locate(name, address).await?;
            self.registry
                .relocate_station(&mut self.map, id, name, address, coordinates)?;
        }

        self.notify(&format!("Updated station: {name}"));
        Ok(())
    }

    /// Delete a station together with its employees and carriers.
    pub fn delete_station(&mut self, id: StationId) -> Result<Station, RegistryError> {
        let station = self.registry.delete_station(&mut self.map, id)?;
        self.notify(&format!("Removed: {}", station.name()));
        Ok(station)
    }

    /// Centre the map on a station.
    ///
    /// Returns the station's coordinates, or `None` if it has none.
    pub fn focus_station(&mut self, id: StationId) -> Result<Option<Coordinates>, RegistryError> {
        let station = self
            .registry
            .station(id)
            .ok_or(RegistryError::UnknownStation(id))?;
        let name = station.name().to_string();

        match station.coordinates() {
            Some(coordinates) => {
                self.map.set_position(coordinates);
                self.map.set_zoom(self.map_config.focus_zoom);
                self.notify(&format!("Centered on: {name}"));
                Ok(Some(coordinates))
            }
            None => {
                self.notify(&format!("No coordinates for {name}"));
                Ok(None)
            }
        }
    }

    /// Station listing lines, in display order.
    pub fn station_lines(&self) -> Vec<(StationId, String)> {
        self.registry
            .stations()
            .map(|s| (s.id(), s.display_line()))
            .collect()
    }

    // ---- employees and carriers ----

    pub fn create_dependent(
        &mut self,
        kind: DependentKind,
        name: &str,
        attribute: &str,
        station: Option<StationId>,
    ) -> Result<DependentId, RegistryError> {
        let id = self
            .registry
            .create_dependent(kind, name, attribute, station)?;
        self.notify(&format!("Added {kind}: {name}"));
        Ok(id)
    }

    pub fn edit_dependent(
        &mut self,
        id: DependentId,
        name: &str,
        attribute: &str,
        station: Option<StationId>,
    ) -> Result<(), RegistryError> {
        self.registry
            .edit_dependent(&mut self.map, id, name, attribute, station)?;
        self.notify(&format!("Updated {}: {name}", id.kind()));
        Ok(())
    }

    pub fn delete_dependent(&mut self, id: DependentId) -> Result<Dependent, RegistryError> {
        let dependent = self.registry.delete_dependent(&mut self.map, id)?;
        self.notify(&format!("Removed: {}", dependent.name()));
        Ok(dependent)
    }

    /// Show a hidden employee or carrier next to its station, or hide a
    /// shown one.
    pub fn toggle_marker(&mut self, id: DependentId) -> Result<MarkerToggle, RegistryError> {
        let result = self.registry.toggle_marker(&mut self.map, id);
        let name = self
            .registry
            .dependent(id)
            .map(|d| d.name().to_string())
            .unwrap_or_default();

        match &result {
            Ok(MarkerToggle::Shown(_)) => self.notify(&format!("Shown on map: {name}")),
            Ok(MarkerToggle::Hidden) => self.notify(&format!("Hidden on map: {name}")),
            Err(e @ RegistryError::NoStationLocation { .. }) => {
                warn!(dependent = %id, error = %e, "marker not placed");
                self.notify(&format!("Warning: {e}"));
            }
            Err(_) => {}
        }
        result
    }

    /// Listing lines for employees or carriers, in display order.
    pub fn dependent_lines(
        &self,
        kind: DependentKind,
    ) -> Result<Vec<(DependentId, String)>, RegistryError> {
        self.registry
            .dependents(kind)
            .map(|d| self.registry.dependent_line(d).map(|line| (d.id(), line)))
            .collect()
    }

    // ---- queries ----

    pub fn details(&self, target: EntityRef) -> Result<EntityDetails, RegistryError> {
        self.registry.details(target)
    }

    /// Verify that the registry is internally consistent and that the map
    /// holds exactly the placed markers.
    pub fn check_consistency(&self) -> Result<(), ReferentialViolation> {
        self.registry.check_consistency()?;
        let placed = self.registry.placed_count();
        if placed != self.map.len() {
            return Err(ReferentialViolation::MarkerCount {
                placed,
                on_map: self.map.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::FixtureGeocoder;
    use crate::status::StatusLog;

    fn central() -> Coordinates {
        Coordinates::new(52.0, 21.0)
    }

    fn fixture() -> FixtureGeocoder {
        FixtureGeocoder::new()
            .with_place("Central, Warszawa, Polska", central())
            .with_place("Central, Kraków, Polska", Coordinates::new(50.0, 19.0))
            .with_place("West, Poznań, Polska", Coordinates::new(52.4, 16.9))
            .with_failure("Central, Offline, Polska")
    }

    fn network() -> (StationNetwork<FixtureGeocoder>, StatusLog) {
        let status = StatusLog::new();
        let network = StationNetwork::new(fixture()).with_status(status.clone());
        (network, status)
    }

    #[tokio::test]
    async fn create_station_geocodes_and_centres_map() {
        let (mut net, status) = network();

        let id = net.create_station("Central", "Warszawa").await.unwrap();

        let station = net.registry().station(id).unwrap();
        assert_eq!(station.coordinates(), Some(central()));
        assert_eq!(net.map().view().center, central());
        assert_eq!(net.map().view().zoom, 16);
        assert_eq!(
            status.history(),
            vec!["Locating: Central, Warszawa, Polska...", "Location found!"]
        );
        net.check_consistency().unwrap();
    }

    #[tokio::test]
    async fn create_station_not_found_adds_nothing() {
        let (mut net, status) = network();

        let err = net.create_station("Atlantis", "Ocean").await.unwrap_err();

        assert_eq!(
            err,
            RegistryError::GeocodeNotFound {
                query: "Atlantis, Ocean, Polska".into()
            }
        );
        assert_eq!(net.registry().station_count(), 0);
        assert!(net.map().is_empty());
        assert_eq!(status.latest().as_deref(), Some("Location not found."));
    }

    #[tokio::test]
    async fn create_station_network_error_adds_nothing() {
        let (mut net, _) = network();

        let err = net.create_station("Central", "Offline").await.unwrap_err();

        assert!(matches!(err, RegistryError::GeocodeFailed { .. }));
        assert_eq!(net.registry().station_count(), 0);
    }

    #[tokio::test]
    async fn create_station_validates_before_geocoding() {
        let (mut net, status) = network();

        let err = net.create_station("  ", "Warszawa").await.unwrap_err();

        assert_eq!(err, RegistryError::Validation(ValidationError::EmptyField("name")));
        assert_eq!(net.resolver().geocoder().calls(), 0);
        assert!(status.history().is_empty());
    }

    #[tokio::test]
    async fn rename_does_not_geocode() {
        let (mut net, status) = network();
        let id = net.create_station("Central", "Warszawa").await.unwrap();
        let calls = net.resolver().geocoder().calls();

        net.edit_station(id, "Warszawa Centralna", "Warszawa")
            .await
            .unwrap();

        assert_eq!(net.resolver().geocoder().calls(), calls);
        let station = net.registry().station(id).unwrap();
        assert_eq!(station.name(), "Warszawa Centralna");
        assert_eq!(station.coordinates(), Some(central()));
        assert_eq!(
            status.latest().as_deref(),
            Some("Updated station: Warszawa Centralna")
        );
        net.check_consistency().unwrap();
    }

    #[tokio::test]
    async fn address_change_moves_station_and_shown_dependents() {
        let (mut net, _) = network();
        let id = net.create_station("Central", "Warszawa").await.unwrap();
        let a = net
            .create_dependent(DependentKind::Employee, "A", "Dispatcher", Some(id))
            .unwrap();
        net.toggle_marker(a).unwrap();

        net.edit_station(id, "Central", "Kraków").await.unwrap();

        let station = net.registry().station(id).unwrap();
        assert_eq!(station.address(), "Kraków");
        assert_eq!(station.coordinates(), Some(Coordinates::new(50.0, 19.0)));
        let at = net.registry().dependent(a).unwrap().coordinates().unwrap();
        assert!((at.latitude - 50.0005).abs() < 1e-12);
        assert!((at.longitude - 19.0).abs() < 1e-12);
        net.check_consistency().unwrap();
    }

    #[tokio::test]
    async fn failed_regeocode_leaves_everything_unchanged() {
        let (mut net, status) = network();
        let id = net.create_station("Central", "Warszawa").await.unwrap();
        let a = net
            .create_dependent(DependentKind::Carrier, "A", "EMU", Some(id))
            .unwrap();
        net.toggle_marker(a).unwrap();
        let station_before = net.registry().station(id).unwrap().clone();
        let dependent_before = net.registry().dependent(a).unwrap().clone();
        let markers_before: Vec<_> = net.map().markers().cloned().collect();

        let err = net
            .edit_station(id, "Renamed", "Nowhere")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::GeocodeNotFound {
                query: "Renamed, Nowhere, Polska".into()
            }
        );
        let err = net.edit_station(id, "Central", "Offline").await.unwrap_err();
        assert!(matches!(err, RegistryError::GeocodeFailed { .. }));

        assert_eq!(net.registry().station(id).unwrap(), &station_before);
        assert_eq!(net.registry().dependent(a).unwrap(), &dependent_before);
        let markers_after: Vec<_> = net.map().markers().cloned().collect();
        assert_eq!(markers_after, markers_before);
        assert!(status.latest().unwrap().starts_with("Network error: "));
    }

    #[tokio::test]
    async fn edit_unknown_station() {
        let (mut net, _) = network();
        let err = net
            .edit_station(StationId::new(9), "X", "Y")
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::UnknownStation(StationId::new(9)));
    }

    #[tokio::test]
    async fn dependent_status_messages() {
        let (mut net, status) = network();
        let id = net.create_station("Central", "Warszawa").await.unwrap();

        let e = net
            .create_dependent(DependentKind::Employee, "Anna", "Dispatcher", Some(id))
            .unwrap();
        assert_eq!(status.latest().as_deref(), Some("Added employee: Anna"));

        let c = net
            .create_dependent(DependentKind::Carrier, "KM", "EMU", Some(id))
            .unwrap();
        assert_eq!(status.latest().as_deref(), Some("Added carrier: KM"));

        net.toggle_marker(e).unwrap();
        assert_eq!(status.latest().as_deref(), Some("Shown on map: Anna"));
        net.toggle_marker(e).unwrap();
        assert_eq!(status.latest().as_deref(), Some("Hidden on map: Anna"));

        net.edit_dependent(c, "Koleje Mazowieckie", "DMU", Some(id))
            .unwrap();
        assert_eq!(
            status.latest().as_deref(),
            Some("Updated carrier: Koleje Mazowieckie")
        );

        net.delete_dependent(e).unwrap();
        assert_eq!(status.latest().as_deref(), Some("Removed: Anna"));
        net.check_consistency().unwrap();
    }

    #[tokio::test]
    async fn toggle_without_station_location_warns() {
        let (mut net, status) = network();
        let id = net.create_station("Central", "Warszawa").await.unwrap();
        let e = net
            .create_dependent(DependentKind::Employee, "Anna", "Dispatcher", Some(id))
            .unwrap();
        let station = net.registry.station_mut(id).unwrap();
        crate::domain::remove_marker(&mut station.entity, &mut net.map);

        let err = net.toggle_marker(e).unwrap_err();

        assert_eq!(
            err,
            RegistryError::NoStationLocation {
                station: "Central".into()
            }
        );
        assert_eq!(
            status.latest().as_deref(),
            Some("Warning: station 'Central' has no location on the map")
        );
        assert!(net.map().is_empty());
    }

    #[tokio::test]
    async fn listings() {
        let (mut net, _) = network();
        let central = net.create_station("Central", "Warszawa").await.unwrap();
        let west = net.create_station("West", "Poznań").await.unwrap();
        let a = net
            .create_dependent(DependentKind::Employee, "A", "Dispatcher", Some(west))
            .unwrap();

        assert_eq!(
            net.station_lines(),
            vec![
                (central, "Central (Warszawa)".to_string()),
                (west, "West (Poznań)".to_string()),
            ]
        );
        assert_eq!(
            net.dependent_lines(DependentKind::Employee).unwrap(),
            vec![(a, "A [West]".to_string())]
        );
        assert!(net.dependent_lines(DependentKind::Carrier).unwrap().is_empty());
    }

    #[tokio::test]
    async fn focus_station_moves_view() {
        let (mut net, status) = network();
        let central_id = net.create_station("Central", "Warszawa").await.unwrap();
        net.create_station("West", "Poznań").await.unwrap();

        let at = net.focus_station(central_id).unwrap();

        assert_eq!(at, Some(central()));
        assert_eq!(net.map().view().center, central());
        assert_eq!(net.map().view().zoom, 17);
        assert_eq!(status.latest().as_deref(), Some("Centered on: Central"));
        assert_eq!(
            net.focus_station(StationId::new(99)).unwrap_err(),
            RegistryError::UnknownStation(StationId::new(99))
        );
    }

    #[tokio::test]
    async fn delete_station_reports_and_cascades() {
        let (mut net, status) = network();
        let id = net.create_station("Central", "Warszawa").await.unwrap();
        let a = net
            .create_dependent(DependentKind::Employee, "A", "Dispatcher", Some(id))
            .unwrap();
        net.toggle_marker(a).unwrap();

        net.delete_station(id).unwrap();

        assert!(net.registry().dependent(a).is_none());
        assert!(net.map().is_empty());
        assert_eq!(status.latest().as_deref(), Some("Removed: Central"));
        net.check_consistency().unwrap();
    }

    #[test]
    fn starts_at_home_view() {
        let net = StationNetwork::new(FixtureGeocoder::new());
        let view = net.map().view();
        assert_eq!(view.center, Coordinates::new(52.23, 21.01));
        assert_eq!(view.zoom, 6);
    }

    #[tokio::test]
    async fn custom_country() {
        let geocoder = FixtureGeocoder::new()
            .with_place("Kiel Hbf, Kiel, Deutschland", Coordinates::new(54.3, 10.1));
        let mut net = StationNetwork::new(geocoder).with_resolver_config(
            ResolverConfig::default().with_country("Deutschland", &["deutschland", "germany"]),
        );

        let id = net.create_station("Kiel Hbf", "Kiel").await.unwrap();

        assert_eq!(
            net.registry().station(id).unwrap().coordinates(),
            Some(Coordinates::new(54.3, 10.1))
        );
    }
}
