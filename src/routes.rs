use crate::{SharedData, api, logging};
use axum::Router;
use axum::http::{Method, header};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Any origin may call the API
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// Assembles every route the service exposes, along with its documentation, CORS handling and
/// request tracing
pub fn build_router(shared_data: Arc<SharedData>) -> Router {
    let routes = Router::new()
        .merge(api::root::root_routes())
        .merge(api::todo::todo_routes())
        .layer(cors_layer());

    logging::attach_tracing_http(routes)
        .merge(api::swagger_main::build_documentation())
        .with_state(shared_data)
}
