use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use catalog_core::DomainError;
use catalog_infra::StoreError;
use catalog_products::Category;

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound(id) => not_found(id),
        StoreError::Backend(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
        StoreError::Decode(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "decode_error", msg)
        }
        StoreError::InvalidState(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "invalid_state", msg)
        }
    }
}

pub fn not_found(id: i32) -> axum::response::Response {
    json_error(
        StatusCode::NOT_FOUND,
        "not_found",
        format!("No product found with id {id}"),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn parse_category(s: &str) -> Result<Category, axum::response::Response> {
    Category::parse(s).map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_category",
            format!("invalid category: {s}"),
        )
    })
}

pub fn parse_available(s: &str) -> Result<bool, axum::response::Response> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(json_error(
            StatusCode::BAD_REQUEST,
            "invalid_available",
            format!("available must be true or false, got: {s}"),
        )),
    }
}
