use std::net::SocketAddr;

use station_mapper::geocode::{
    AnyGeocoder, CachedGeocoder, FixtureGeocoder, GeocodeCacheConfig, NominatimClient,
    NominatimConfig,
};
use station_mapper::network::StationNetwork;
use station_mapper::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Bind address used when `STATION_MAPPER_ADDR` is not set.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("STATION_MAPPER_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .expect("STATION_MAPPER_ADDR is not a valid socket address");

    // Offline mode answers from a fixture file instead of Nominatim
    let geocoder = match std::env::var("GEOCODER_FIXTURES") {
        Ok(path) => {
            let fixture =
                FixtureGeocoder::from_json_file(&path).expect("Failed to load geocoder fixtures");
            info!(path = %path, places = fixture.len(), "using fixture geocoder");
            AnyGeocoder::Fixture(fixture)
        }
        Err(_) => {
            let mut config = NominatimConfig::new();
            if let Ok(url) = std::env::var("NOMINATIM_URL") {
                config = config.with_base_url(url);
            }
            match std::env::var("NOMINATIM_USER_AGENT") {
                Ok(agent) => config = config.with_user_agent(agent),
                Err(_) => warn!(
                    user_agent = %config.user_agent,
                    "NOMINATIM_USER_AGENT not set; using default"
                ),
            }
            info!(base_url = %config.base_url, "using Nominatim geocoder");
            let client = NominatimClient::new(config).expect("Failed to create Nominatim client");
            AnyGeocoder::Nominatim(CachedGeocoder::new(client, &GeocodeCacheConfig::default()))
        }
    };

    let state = AppState::new(StationNetwork::new(geocoder));
    let app = create_router(state);

    info!("Station mapper listening on http://{addr}");
    info!("API Endpoints:");
    info!("  GET  /health                              - Health check");
    info!("  GET  /api/stations                        - List stations");
    info!("  POST /api/stations                        - Create a station");
    info!("  GET  /api/dependents/{{employee|carrier}}   - List employees or carriers");
    info!("  GET  /api/map                             - Markers and view");
    info!("  GET  /api/status                          - Status line");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
