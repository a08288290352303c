use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Greeting {
    success: bool,
    message: String,
}

/// Greeting, useful as a smoke test
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service greeting", body = Greeting)
    )
)]
pub(crate) async fn index() -> Json<Greeting> {
    Json(Greeting {
        success: true,
        message: "hello-coffee".to_string(),
    })
}
