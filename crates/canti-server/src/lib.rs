//! Canti chat relay HTTP server (Axum).
//!
//! One POST endpoint that forwards a session's transcript to the completion
//! provider, plus a health probe.

pub mod error;
pub mod logging;
pub mod relay;
pub mod routes;
pub mod state;

use axum::Router;
use state::AppState;

/// Build the application router with a custom state.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::relay_routes())
        .fallback(routes::not_found)
        .with_state(state)
}
