use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde_json::json;

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": 200, "message": "OK"})))
}

/// Static landing page for the catalog administration UI.
pub async fn index() -> Html<&'static str> {
    tracing::debug!("home page");
    Html(include_str!("../../../static/index.html"))
}
