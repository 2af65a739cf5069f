//! ETA engine errors.

use crate::fleet::FleetError;

/// Errors surfaced to ETA callers.
///
/// Routing-engine failures never appear here; they are absorbed into
/// fallback estimates by the routing client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EtaError {
    /// Bad parameters (stop count, target count, coordinates)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown vehicle, inactive vehicle, or no active schedule.
    /// Deliberately one message for all three.
    #[error("vehicle not found or not currently available")]
    NotAvailable,

    /// Live position could not be fetched
    #[error("unable to fetch vehicle location: {0}")]
    UpstreamUnavailable(String),
}

impl From<FleetError> for EtaError {
    fn from(e: FleetError) -> Self {
        match e {
            FleetError::NotFound(_) => EtaError::NotAvailable,
            FleetError::UpstreamUnavailable { message, .. } => {
                EtaError::UpstreamUnavailable(message)
            }
            FleetError::Load { .. } => EtaError::UpstreamUnavailable(e.to_string()),
        }
    }
}
