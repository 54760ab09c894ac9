//! Railway station registry with a map.
//!
//! Keeps stations, their employees and carriers, places markers for them on
//! a map surface, geocodes station addresses, and serves the whole thing as
//! a JSON API.

pub mod domain;
pub mod geocode;
pub mod map;
pub mod network;
pub mod placement;
pub mod registry;
pub mod status;
pub mod web;
