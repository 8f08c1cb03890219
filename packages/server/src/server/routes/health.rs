use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    ok: bool,
}

/// Liveness probe
///
/// The process keeps no external connections worth checking; answering at
/// all means the server is up.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
