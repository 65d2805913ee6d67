use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::service::PageService;

/// Build the axum router with all pagedrop endpoints.
pub fn build_router(service: Arc<PageService>) -> Router {
    Router::new()
        .route("/api/health", get(handler::health_handler))
        .route("/api/info", get(handler::info_handler))
        .route("/api/deployments", get(handler::list_handler))
        .route("/api/deploy", post(handler::deploy_handler))
        .route(
            "/api/deployments/:page_id",
            get(handler::get_handler)
                .patch(handler::update_handler)
                .delete(handler::delete_handler),
        )
        .route("/view/:key", get(handler::view_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}
