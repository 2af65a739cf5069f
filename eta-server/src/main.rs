use eta_server::config::ServerConfig;
use eta_server::fleet::{FleetDirectory, GpsClient};
use eta_server::osrm::OsrmClient;
use eta_server::registry::campus_routes;
use eta_server::routing::RoutingClient;
use eta_server::web::{AppState, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("eta_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    // Routing engine (optional: without it every ETA is a fallback estimate)
    let routing = match config.osrm.clone() {
        Some(osrm_config) => {
            info!(url = %osrm_config.base_url, "using routing engine");
            let client = OsrmClient::new(osrm_config).expect("Failed to create OSRM client");
            RoutingClient::new(client, &config.cache)
        }
        None => {
            warn!("OSRM_BASE_URL disabled, all ETAs will be fallback estimates");
            RoutingClient::offline(&config.cache)
        }
    };

    // GPS tracking (optional: without it position lookups fail)
    let gps = match config.gps.clone() {
        Some(gps_config) => Some(GpsClient::new(gps_config).expect("Failed to create GPS client")),
        None => {
            warn!("GPS_BASE_URL/GPS_ENDPOINT not set, live positions unavailable");
            None
        }
    };

    let fleet = FleetDirectory::load(&config.fleet_file, gps).expect("Failed to load fleet file");
    info!(
        path = %config.fleet_file.display(),
        vehicles = fleet.len(),
        "loaded fleet"
    );

    let registry = campus_routes().expect("Invalid route table");
    info!(routes = registry.len(), "loaded routes");

    let state = AppState::new(fleet, routing, registry, config.eta.clone());
    let app = create_router(state);

    info!("Shuttle ETA server listening on http://{}", config.bind_addr);
    info!("  GET  /health                              - Health check");
    info!("  GET  /api/client/eta/upcoming             - ETAs to a vehicle's next stops");
    info!("  POST /api/client/eta/by-coordinates       - ETAs from a point to named targets");
    info!("  GET  /api/client/routes                   - Registered routes");
    info!("  GET  /api/client/routes/{{route_id}}/stops - Stops of one route");

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
