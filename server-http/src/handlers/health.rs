use crate::api::MessageResponse;
use axum::Json;

/// GET /
pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse::new("Hello World"))
}

/// GET /health
pub async fn health_check() -> Json<MessageResponse> {
    Json(MessageResponse::new("OK"))
}
