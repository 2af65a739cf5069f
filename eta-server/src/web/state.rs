//! Application state for the web layer.

use std::sync::Arc;

use crate::eta::EtaConfig;
use crate::fleet::{FleetDirectory, FleetProvider};
use crate::registry::RouteRegistry;
use crate::routing::RoutingClient;

/// Shared application state.
///
/// Contains all the services needed to handle requests. Generic over the
/// fleet so handlers can be exercised without a GPS account.
pub struct AppState<F = FleetDirectory> {
    /// Vehicles, schedules and live positions
    pub fleet: Arc<F>,

    /// Cached routing-engine client
    pub routing: Arc<RoutingClient>,

    /// Registered shuttle routes
    pub registry: Arc<RouteRegistry>,

    /// ETA thresholds
    pub config: Arc<EtaConfig>,
}

impl<F: FleetProvider> AppState<F> {
    /// Create a new app state.
    pub fn new(
        fleet: F,
        routing: RoutingClient,
        registry: RouteRegistry,
        config: EtaConfig,
    ) -> Self {
        Self {
            fleet: Arc::new(fleet),
            routing: Arc::new(routing),
            registry: Arc::new(registry),
            config: Arc::new(config),
        }
    }
}

// Manual impl: `F` itself need not be `Clone`.
impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            fleet: Arc::clone(&self.fleet),
            routing: Arc::clone(&self.routing),
            registry: Arc::clone(&self.registry),
            config: Arc::clone(&self.config),
        }
    }
}
