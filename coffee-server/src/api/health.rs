use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Basic health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct Health {
    status: &'static str,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    details: Map<String, Value>,
    #[serde(skip)]
    status_code: StatusCode,
}

impl IntoResponse for Health {
    fn into_response(self) -> Response {
        let status_code = self.status_code;
        (status_code, Json(self)).into_response()
    }
}

fn component_status(result: &Result<(), String>) -> Value {
    match result {
        Ok(()) => Value::from("healthy"),
        Err(e) => Value::from(format!("unhealthy: {}", e)),
    }
}

/// Basic health check handler
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is healthy", body = Health)
    )
)]
pub(crate) async fn health_check() -> Health {
    Health {
        status: "ok",
        details: Map::new(),
        status_code: StatusCode::OK,
    }
}

/// Readiness check handler
#[utoipa::path(
    get,
    path = "/ready",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is ready", body = Health),
        (status = 503, description = "Service is not ready", body = Health)
    )
)]
pub(crate) async fn ready_check(State(state): State<AppState>) -> Health {
    let health = state.health_check().await;

    let mut details = Map::new();
    details.insert("store_status".to_string(), component_status(&health.store));
    details.insert("keys_status".to_string(), component_status(&health.keys));

    if health.is_healthy() {
        Health {
            status: "ok",
            details,
            status_code: StatusCode::OK,
        }
    } else {
        log::warn!("Readiness check failed: {:?}", health);
        Health {
            status: "error",
            details,
            status_code: StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
