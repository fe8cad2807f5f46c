// libs/schedule-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn schedule_routes(state: Arc<AppConfig>) -> Router {
    // Slot resolution is public: the client-facing booking page queries it
    // before any account exists.
    let public_routes = Router::new().route(
        "/professionals/{professional_id}/slots",
        get(handlers::get_available_slots),
    );

    let protected_routes = Router::new()
        .route("/working-hours", get(handlers::get_working_hours))
        .route("/working-hours", put(handlers::update_working_hours))
        .route("/blocked-times", get(handlers::list_blocked_times))
        .route("/blocked-times", post(handlers::create_blocked_time))
        .route("/blocked-times/{blocked_time_id}", delete(handlers::delete_blocked_time))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
