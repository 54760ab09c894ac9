//! In-memory map surface.

use indexmap::IndexMap;
use serde::Serialize;

use crate::domain::{Coordinates, EntityRef};

use super::config::MapConfig;
use super::{MapSurface, MarkerHandle, MarkerStyle};

/// A marker as stored by [`MarkerLayer`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub handle: MarkerHandle,
    pub position: Coordinates,
    pub label: String,
    pub style: MarkerStyle,
    pub target: EntityRef,
}

/// Current centre and zoom of the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
}

/// Map surface that keeps markers in memory, in insertion order.
#[derive(Debug, Clone)]
pub struct MarkerLayer {
    markers: IndexMap<MarkerHandle, Marker>,
    next_handle: u64,
    view: MapView,
}

impl MarkerLayer {
    /// Create an empty layer centred on the default home view.
    pub fn new() -> Self {
        Self::with_config(&MapConfig::default())
    }

    pub fn with_config(config: &MapConfig) -> Self {
        Self {
            markers: IndexMap::new(),
            next_handle: 1,
            view: MapView {
                center: config.home,
                zoom: config.home_zoom,
            },
        }
    }

    pub fn get(&self, handle: MarkerHandle) -> Option<&Marker> {
        self.markers.get(&handle)
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.values()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn view(&self) -> MapView {
        self.view
    }

    /// Resolve a click on a marker to the entity it belongs to.
    pub fn click(&self, handle: MarkerHandle) -> Option<EntityRef> {
        self.markers.get(&handle).map(|m| m.target)
    }
}

impl Default for MarkerLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MapSurface for MarkerLayer {
    fn set_marker(
        &mut self,
        position: Coordinates,
        label: &str,
        style: &MarkerStyle,
        target: EntityRef,
    ) -> MarkerHandle {
        let handle = MarkerHandle::new(self.next_handle);
        self.next_handle += 1;
        self.markers.insert(
            handle,
            Marker {
                handle,
                position,
                label: label.to_string(),
                style: style.clone(),
                target,
            },
        );
        handle
    }

    fn delete_marker(&mut self, handle: MarkerHandle) {
        self.markers.shift_remove(&handle);
    }

    fn set_label(&mut self, handle: MarkerHandle, label: &str) {
        if let Some(marker) = self.markers.get_mut(&handle) {
            marker.label = label.to_string();
        }
    }

    fn set_position(&mut self, position: Coordinates) {
        self.view.center = position;
    }

    fn set_zoom(&mut self, level: u8) {
        self.view.zoom = level;
    }
}
