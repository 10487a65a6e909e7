use axum::routing::{get, post};
use axum::Router;

use crate::handler;
use crate::state::AppState;

pub mod endpoints {
    pub const HEALTH: &str = "/health";
    pub const PACKAGE: &str = "/api/package";
    pub const TRACK: &str = "/api/package/track/:id";
    pub const HISTORY: &str = "/api/package/history/:id";
}

/// Build the axum router with all Waybill endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::HEALTH, get(handler::health_handler))
        .route(endpoints::PACKAGE, post(handler::create_package))
        .route(endpoints::TRACK, post(handler::track_package))
        .route(endpoints::HISTORY, get(handler::package_history))
        .with_state(state)
}
