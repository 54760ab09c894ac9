//! Station registry and cascade rules.
//!
//! The [`Registry`] owns every station, employee and carrier. Dependents
//! point at their station by id and each station lists its dependents; the
//! registry keeps both sides in step on every create, edit and delete, and
//! deletes a station's dependents together with it.

mod consistency;
mod details;
mod error;
mod store;


pub use details::EntityDetails;
pub use error::{ReferentialViolation, RegistryError};
pub use store::{MarkerToggle, Registry};
