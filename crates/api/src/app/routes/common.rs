use axum::http::{header, HeaderMap, StatusCode};

use crate::app::errors;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Check that the request carries `Content-Type: application/json`.
///
/// Media-type parameters (`; charset=...`) are ignored; a missing or
/// different content type is a 415.
pub fn check_content_type(headers: &HeaderMap) -> Result<(), axum::response::Response> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let Some(content_type) = content_type else {
        tracing::error!("no Content-Type specified");
        return Err(unsupported_media_type());
    };

    let essence = content_type.split(';').next().unwrap_or("").trim();
    if essence.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
        return Ok(());
    }

    tracing::error!(content_type, "invalid Content-Type");
    Err(unsupported_media_type())
}

fn unsupported_media_type() -> axum::response::Response {
    errors::json_error(
        StatusCode::UNSUPPORTED_MEDIA_TYPE,
        "unsupported_media_type",
        format!("Content-Type must be {JSON_CONTENT_TYPE}"),
    )
}
