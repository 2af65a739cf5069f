//! Web layer for the shuttle ETA service.
//!
//! Provides HTTP endpoints for upcoming-stop ETAs, coordinate ETAs and the
//! route list.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
