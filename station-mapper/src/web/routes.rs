//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
};
use tracing::{error, warn};

use crate::domain::{DependentId, DependentKind, EntityRef, StationId};
use crate::registry::RegistryError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stations", get(list_stations).post(create_station))
        .route("/api/stations/:id", put(edit_station).delete(delete_station))
        .route("/api/stations/:id/focus", post(focus_station))
        .route("/api/stations/:id/details", get(station_details))
        .route(
            "/api/dependents/:kind",
            get(list_dependents).post(create_dependent),
        )
        .route(
            "/api/dependents/:kind/:id",
            put(edit_dependent).delete(delete_dependent),
        )
        .route("/api/dependents/:kind/:id/toggle", post(toggle_marker))
        .route("/api/dependents/:kind/:id/details", get(dependent_details))
        .route("/api/map", get(map_view))
        .route("/api/status", get(status))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

// ---- stations ----

async fn list_stations(State(state): State<AppState>) -> Json<Vec<StationItem>> {
    let network = state.network.lock().await;
    Json(
        network
            .registry()
            .stations()
            .map(StationItem::from_station)
            .collect(),
    )
}

async fn create_station(
    State(state): State<AppState>,
    Json(req): Json<StationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut network = state.network.lock().await;
    let id = network.create_station(&req.name, &req.address).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.get() })))
}

async fn edit_station(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<StationRequest>,
) -> Result<Json<StationItem>, AppError> {
    let id = StationId::new(id);
    let mut network = state.network.lock().await;
    network.edit_station(id, &req.name, &req.address).await?;

    let station = network
        .registry()
        .station(id)
        .ok_or(RegistryError::UnknownStation(id))?;
    Ok(Json(StationItem::from_station(station)))
}

async fn delete_station(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<RemovedResponse>, AppError> {
    let mut network = state.network.lock().await;
    let station = network.delete_station(StationId::new(id))?;
    Ok(Json(RemovedResponse {
        name: station.name().to_string(),
    }))
}

async fn focus_station(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<FocusResponse>, AppError> {
    let mut network = state.network.lock().await;
    let coordinates = network.focus_station(StationId::new(id))?;
    Ok(Json(FocusResponse { coordinates }))
}

async fn station_details(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DetailsResponse>, AppError> {
    let network = state.network.lock().await;
    let details = network.details(EntityRef::Station(StationId::new(id)))?;
    Ok(Json(details.into()))
}

// ---- employees and carriers ----

async fn list_dependents(
    State(state): State<AppState>,
    Path(kind): Path<DependentKind>,
) -> Result<Json<Vec<DependentItem>>, AppError> {
    let network = state.network.lock().await;
    let registry = network.registry();
    let items = registry
        .dependents(kind)
        .map(|d| {
            registry
                .dependent_line(d)
                .map(|line| DependentItem::from_dependent(d, line))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(items))
}

async fn create_dependent(
    State(state): State<AppState>,
    Path(kind): Path<DependentKind>,
    Json(req): Json<DependentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut network = state.network.lock().await;
    let id = network.create_dependent(
        kind,
        &req.name,
        &req.attribute,
        req.station.map(StationId::new),
    )?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.seq() })))
}

async fn edit_dependent(
    State(state): State<AppState>,
    Path((kind, id)): Path<(DependentKind, u64)>,
    Json(req): Json<DependentRequest>,
) -> Result<Json<DependentItem>, AppError> {
    let id = DependentId::new(kind, id);
    let mut network = state.network.lock().await;
    network.edit_dependent(
        id,
        &req.name,
        &req.attribute,
        req.station.map(StationId::new),
    )?;

    let registry = network.registry();
    let dependent = registry
        .dependent(id)
        .ok_or(RegistryError::UnknownDependent(id))?;
    Ok(Json(DependentItem::from_dependent(
        dependent,
        registry.dependent_line(dependent)?,
    )))
}

async fn delete_dependent(
    State(state): State<AppState>,
    Path((kind, id)): Path<(DependentKind, u64)>,
) -> Result<Json<RemovedResponse>, AppError> {
    let mut network = state.network.lock().await;
    let dependent = network.delete_dependent(DependentId::new(kind, id))?;
    Ok(Json(RemovedResponse {
        name: dependent.name().to_string(),
    }))
}

async fn toggle_marker(
    State(state): State<AppState>,
    Path((kind, id)): Path<(DependentKind, u64)>,
) -> Result<Json<ToggleResponse>, AppError> {
    let mut network = state.network.lock().await;
    let toggle = network.toggle_marker(DependentId::new(kind, id))?;
    Ok(Json(toggle.into()))
}

async fn dependent_details(
    State(state): State<AppState>,
    Path((kind, id)): Path<(DependentKind, u64)>,
) -> Result<Json<DetailsResponse>, AppError> {
    let network = state.network.lock().await;
    let details = network.details(EntityRef::Dependent(DependentId::new(kind, id)))?;
    Ok(Json(details.into()))
}

// ---- map and status ----

async fn map_view(State(state): State<AppState>) -> Json<MapResponse> {
    let network = state.network.lock().await;
    let map = network.map();
    Json(MapResponse {
        view: map.view(),
        markers: map.markers().cloned().collect(),
    })
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        latest: state.status.latest(),
        history: state.status.history(),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        let message = e.to_string();
        match e {
            RegistryError::Validation(_)
            | RegistryError::NoStationLocation { .. }
            | RegistryError::GeocodeNotFound { .. }
            | RegistryError::GeocodeFailed { .. } => AppError::BadRequest { message },
            RegistryError::UnknownStation(_) | RegistryError::UnknownDependent(_) => {
                AppError::NotFound { message }
            }
            RegistryError::Inconsistent(_) => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
