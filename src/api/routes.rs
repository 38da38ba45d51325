use axum::{
    middleware,
    routing::{get, MethodRouter},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::auth::require_bearer_token;
use crate::metrics::MetricsPipeline;

use super::handlers::{get_clicks, health_check, root, unimplemented, AppState};

pub fn create_api_router(pipeline: Arc<MetricsPipeline>, api_version: &str) -> Router {
    let state = Arc::new(AppState {
        pipeline,
        api_version: api_version.to_string(),
    });

    let clicks_path = format!("/api/{api_version}/get-clicks");

    Router::new()
        .route("/", get(root).fallback(unimplemented))
        .route("/health", get(health_check))
        .route(&clicks_path, clicks_route())
        .route(&format!("{clicks_path}/"), clicks_route())
        .fallback(unimplemented)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Only GET needs a token; other methods fall through to 501.
fn clicks_route() -> MethodRouter<Arc<AppState>> {
    get(get_clicks)
        .route_layer(middleware::from_fn(require_bearer_token))
        .fallback(unimplemented)
}
