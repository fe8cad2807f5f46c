use std::sync::Arc;

use axum::{routing::get, Router};

use auth_cell::router::auth_routes;
use booking_cell::router::{booking_routes, client_routes};
use catalog_cell::router::catalog_routes;
use schedule_cell::router::schedule_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Slotbook API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/services", catalog_routes(state.clone()))
        .nest("/schedule", schedule_routes(state.clone()))
        .nest("/bookings", booking_routes(state.clone()))
        .nest("/clients", client_routes(state))
}
