//! HTTP route handlers.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{Coordinate, Profile, VehicleId};
use crate::eta::{EtaEngine, EtaError, Target};
use crate::fleet::FleetProvider;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<F: FleetProvider + 'static>(state: AppState<F>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/client/eta/upcoming", get(upcoming_eta::<F>))
        .route("/api/client/eta/by-coordinates", post(eta_by_coordinates::<F>))
        .route("/api/client/routes", get(list_routes::<F>))
        .route("/api/client/routes/:route_id/stops", get(route_stops::<F>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

fn parse_mode(mode: Option<&str>) -> Result<Profile, AppError> {
    match mode {
        None => Ok(Profile::default()),
        Some(m) => m.parse().map_err(|e: crate::domain::InvalidProfile| {
            AppError::BadRequest {
                message: e.to_string(),
            }
        }),
    }
}

fn coordinate(lat: f64, lon: f64) -> Result<Coordinate, AppError> {
    Coordinate::new(lat, lon).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })
}

/// ETAs to the next stops of a vehicle's route.
async fn upcoming_eta<F: FleetProvider + 'static>(
    State(state): State<AppState<F>>,
    query: Result<Query<UpcomingEtaRequest>, QueryRejection>,
) -> Result<Json<UpcomingEtaResponse>, AppError> {
    let Query(req) = query.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })?;
    let profile = parse_mode(req.mode.as_deref())?;

    let engine = EtaEngine::new(
        state.fleet.as_ref(),
        state.routing.as_ref(),
        state.registry.as_ref(),
        state.config.as_ref(),
    );
    let eta = engine
        .upcoming(VehicleId(req.vehicle_id), profile, req.max_stops)
        .await?;

    Ok(Json(UpcomingEtaResponse::from_eta(&eta)))
}

/// ETAs from an explicit origin to named targets.
async fn eta_by_coordinates<F: FleetProvider + 'static>(
    State(state): State<AppState<F>>,
    body: Bytes,
) -> Result<Json<CoordinateEtaResponse>, AppError> {
    // Parse JSON manually so malformed bodies get our error shape
    let req: CoordinateEtaRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(&body), "invalid by-coordinates body");
        AppError::BadRequest {
            message: format!("Invalid JSON: {e}"),
        }
    })?;

    let profile = parse_mode(req.mode.as_deref())?;
    let origin = coordinate(req.origin.lat, req.origin.lon)?;
    let targets = req
        .targets
        .into_iter()
        .map(|t| {
            Ok(Target {
                location: coordinate(t.lat, t.lon)?,
                id: t.id,
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let engine = EtaEngine::new(
        state.fleet.as_ref(),
        state.routing.as_ref(),
        state.registry.as_ref(),
        state.config.as_ref(),
    );
    let eta = engine.by_coordinates(origin, targets, profile).await?;

    Ok(Json(CoordinateEtaResponse::from_eta(eta)))
}

/// Every registered route.
async fn list_routes<F: FleetProvider + 'static>(
    State(state): State<AppState<F>>,
) -> Json<RoutesResponse> {
    let routes = state
        .registry
        .routes()
        .iter()
        .map(RouteSummary::from_route)
        .collect();

    Json(RoutesResponse { routes })
}

/// Ordered stops of one route.
async fn route_stops<F: FleetProvider + 'static>(
    State(state): State<AppState<F>>,
    Path(route_id): Path<String>,
) -> Result<Json<RouteStopsResponse>, AppError> {
    let route = state
        .registry
        .get(&route_id)
        .ok_or_else(|| AppError::NotFound {
            message: format!("route {route_id} not found"),
        })?;

    Ok(Json(RouteStopsResponse::from_route(route)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<EtaError> for AppError {
    fn from(e: EtaError) -> Self {
        match e {
            EtaError::InvalidRequest(message) => AppError::BadRequest { message },
            EtaError::NotAvailable => AppError::NotFound {
                message: e.to_string(),
            },
            EtaError::UpstreamUnavailable(_) => AppError::Internal {
                message: e.to_string(),
            },
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
