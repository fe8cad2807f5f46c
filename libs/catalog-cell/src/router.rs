// libs/catalog-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn catalog_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/", post(handlers::create_service))
        .route("/", get(handlers::list_services))
        .route("/{service_id}", get(handlers::get_service))
        .route("/{service_id}", put(handlers::update_service))
        .route("/{service_id}", delete(handlers::archive_service))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(protected_routes).with_state(state)
}
