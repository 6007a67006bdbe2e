use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use catalog_infra::ProductStore;
use catalog_products::Product;

use crate::app::routes::common;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// POST /products — create a record from the JSON body.
pub async fn create_product(
    Extension(store): Extension<Arc<dyn ProductStore>>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    tracing::info!("request to create a product");
    if let Err(resp) = common::check_content_type(&headers) {
        return resp;
    }

    let product = match parse_body(&body) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let created = match store.create(product).await {
        Ok(c) => c,
        Err(e) => return errors::store_error_to_response(e),
    };

    let Some(id) = created.id else {
        return errors::json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "store_error",
            "store returned a created record without an id",
        );
    };
    tracing::info!(id, "product created");

    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/products/{id}"))],
        Json(created.serialize()),
    )
        .into_response()
}

/// GET /products — list records, honoring at most one filter.
///
/// Precedence when several parameters are supplied: `name` wins over
/// `category` wins over `available`; the rest are silently ignored.
pub async fn list_products(
    Extension(store): Extension<Arc<dyn ProductStore>>,
    Query(filter): Query<dto::ListFilter>,
) -> axum::response::Response {
    let result = if let Some(name) = &filter.name {
        tracing::info!(%name, "listing products by name");
        store.find_by_name(name).await
    } else if let Some(category) = &filter.category {
        tracing::info!(%category, "listing products by category");
        match errors::parse_category(category) {
            Ok(c) => store.find_by_category(c).await,
            Err(resp) => return resp,
        }
    } else if let Some(available) = &filter.available {
        tracing::info!(%available, "listing products by availability");
        match errors::parse_available(available) {
            Ok(a) => store.find_by_availability(a).await,
            Err(resp) => return resp,
        }
    } else {
        tracing::info!("listing all products");
        store.all().await
    };

    match result {
        Ok(products) => {
            let body: Vec<Value> = products.iter().map(Product::serialize).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// GET /products/{id} — fetch a record by id.
pub async fn get_product(
    Extension(store): Extension<Arc<dyn ProductStore>>,
    Path(id): Path<i32>,
) -> axum::response::Response {
    tracing::info!(id, "request to fetch a product");
    match store.find(id).await {
        Ok(Some(product)) => (StatusCode::OK, Json(product.serialize())).into_response(),
        Ok(None) => errors::not_found(id),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// PUT /products/{id} — replace every field except the id.
pub async fn update_product(
    Extension(store): Extension<Arc<dyn ProductStore>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    body: Bytes,
) -> axum::response::Response {
    tracing::info!(id, "request to update a product");
    if let Err(resp) = common::check_content_type(&headers) {
        return resp;
    }

    match store.find(id).await {
        Ok(Some(_)) => {}
        Ok(None) => return errors::not_found(id),
        Err(e) => return errors::store_error_to_response(e),
    }

    let mut product = match parse_body(&body) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    product.id = Some(id);

    match store.update(product).await {
        Ok(updated) => (StatusCode::OK, Json(updated.serialize())).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// DELETE /products/{id} — remove a record.
pub async fn delete_product(
    Extension(store): Extension<Arc<dyn ProductStore>>,
    Path(id): Path<i32>,
) -> axum::response::Response {
    tracing::info!(id, "request to delete a product");
    match store.delete(id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => errors::not_found(id),
        Err(e) => errors::store_error_to_response(e),
    }
}

fn parse_body(body: &Bytes) -> Result<Product, axum::response::Response> {
    let payload: Value = serde_json::from_slice(body).map_err(|e| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "bad_request",
            format!("invalid JSON body: {e}"),
        )
    })?;
    Product::deserialize(&payload).map_err(errors::domain_error_to_response)
}
