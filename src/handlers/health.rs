use axum::{Json, http::StatusCode};
use serde_json::{Value, json};

use crate::session::IDLE_TIMEOUT_MS;

pub async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "session-guard-api",
            "version": env!("CARGO_PKG_VERSION"),
            "idleTimeoutMs": IDLE_TIMEOUT_MS
        })),
    )
}
