use crate::routing_utils::Json;
use crate::{AppState, SharedData, dto, persistence};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use std::sync::Arc;
use tracing::warn;
use utoipa::OpenApi;

pub const SERVICE_API_GROUP: &str = "Service";

const BANNER: &str = "This is a todo app";

#[derive(OpenApi)]
#[openapi(paths(banner, health_check))]
/// Defines the OpenAPI documentation for the banner and health check
pub struct RootApi;

/// Adds the banner at "/" and the health check at "/health"
pub fn root_routes() -> Router<Arc<SharedData>> {
    Router::new().route("/", get(banner)).route(
        "/health",
        get(|State(app_state): AppState| async move { health_check(&app_state.ext_cxn).await }),
    )
}

/// Identifies the service
#[utoipa::path(
    get,
    path = "/",
    tag = SERVICE_API_GROUP,
    responses((status = 200, description = "Plain text banner", body = String)),
)]
async fn banner() -> &'static str {
    BANNER
}

/// Reports whether the todo store answers a ping
#[utoipa::path(
    get,
    path = "/health",
    tag = SERVICE_API_GROUP,
    responses(
        (status = 200, description = "The todo store is reachable", body = dto::HealthStatus),
        (status = 503, description = "The todo store could not be reached", body = dto::HealthStatus),
    ),
)]
async fn health_check(
    ext_cxn: &persistence::ExternalConnectivity,
) -> (StatusCode, Json<dto::HealthStatus>) {
    match ext_cxn.ping().await {
        Ok(()) => (StatusCode::OK, Json(dto::HealthStatus::ok())),
        Err(err) => {
            warn!("Health check could not reach MongoDB: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(dto::HealthStatus::unavailable()),
            )
        }
    }
}
