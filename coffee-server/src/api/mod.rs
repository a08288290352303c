pub(crate) mod drinks;
pub(crate) mod health;
pub(crate) mod index;
mod permission_gate;

use crate::config::CorsConfig;
use crate::errors::ApiError;
use crate::state::AppState;
use axum::Router;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method};
use log::warn;
use tower_http::cors::{Any, CorsLayer};
use utoipa_axum::{router::OpenApiRouter, routes};

/// Routes open to everyone, documented through utoipa-axum
pub(super) fn public_router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(index::index))
        .routes(routes!(health::health_check))
        .routes(routes!(health::ready_check))
}

/// Combines all drink routes into a single router
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new().merge(drinks::router(state))
}

/// JSON 404 for any route that does not exist
pub(super) async fn not_found() -> ApiError {
    ApiError::not_found()
}

/// JSON 405 for a known route called with an unsupported method
pub(super) async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Builds the CORS layer shared by every route
pub(super) fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}
