//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::geocode::AnyGeocoder;
use crate::network::StationNetwork;
use crate::status::StatusLog;

/// Shared application state.
///
/// The network sits behind a single async mutex held for a whole command,
/// geocoding included, so commands never interleave.
#[derive(Clone)]
pub struct AppState {
    /// Stations, employees, carriers and the map
    pub network: Arc<Mutex<StationNetwork<AnyGeocoder>>>,

    /// Status line written by the network
    pub status: StatusLog,
}

impl AppState {
    /// Create a new app state, routing the network's status lines to a
    /// shared log.
    pub fn new(network: StationNetwork<AnyGeocoder>) -> Self {
        let status = StatusLog::new();
        let network = network.with_status(status.clone());
        Self {
            network: Arc::new(Mutex::new(network)),
            status,
        }
    }
}
