//! Web layer for the station mapper.
//!
//! Exposes the station network as a JSON API.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
