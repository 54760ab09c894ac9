//! Map surface abstraction.
//!
//! The registry never draws anything itself; it asks a [`MapSurface`] to
//! add and delete markers and to move the view. [`MarkerLayer`] is the
//! in-memory surface the HTTP front end renders from.

mod config;
mod layer;

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinates, EntityRef};

pub use config::MapConfig;
pub use layer::{MapView, Marker, MarkerLayer};

/// Opaque handle of a marker on a map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Visual style applied to a marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub font_size: u8,
    pub text_color: String,
    pub circle_color: String,
    pub outside_color: String,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            font_size: 8,
            text_color: "white".to_string(),
            circle_color: "black".to_string(),
            outside_color: "gray60".to_string(),
        }
    }
}

/// Something markers can be drawn on.
///
/// `target` is what a click on the marker should open; surfaces hand it back
/// to the caller, which resolves it with a details query.
pub trait MapSurface {
    /// Add a marker and return its handle.
    fn set_marker(
        &mut self,
        position: Coordinates,
        label: &str,
        style: &MarkerStyle,
        target: EntityRef,
    ) -> MarkerHandle;

    /// Delete a marker. Unknown handles are ignored.
    fn delete_marker(&mut self, handle: MarkerHandle);
    /// Change the text of a marker in place. Unknown handles are ignored.
    fn set_label(&mut self, handle: MarkerHandle, label: &str);

    /// Centre the view on `position`.
    fn set_position(&mut self, position: Coordinates);

    fn set_zoom(&mut self, level: u8);
}
