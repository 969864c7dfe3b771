use std::{sync::Arc, time::Duration};

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    models::EnergyData,
    services::catalog::CatalogStore,
};

pub mod catalog;
pub mod recommendations;

/// Shared state handed to every handler
pub struct AppState {
    pub catalog: Arc<dyn CatalogStore>,
    pub energy_data: EnergyData,
    pub catalog_timeout: Duration,
    pub image_dir: String,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let images = ServeDir::new(&state.image_dir);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .nest_service("/appliance_images", images)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(catalog::list_categories))
        .route("/subcategories/:category_id", get(catalog::list_subcategories))
        .route("/recommend", post(recommendations::recommend))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
