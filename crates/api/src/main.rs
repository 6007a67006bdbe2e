use std::sync::Arc;

use catalog_infra::{PostgresProductStore, ProductStore};

#[tokio::main]
async fn main() {
    catalog_observability::init();

    let database_uri =
        std::env::var("DATABASE_URI").expect("DATABASE_URI must be set (postgres connection string)");

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let store = PostgresProductStore::connect(&database_uri)
        .await
        .expect("failed to connect to the product store");
    store
        .ensure_schema()
        .await
        .expect("failed to prepare the products schema");

    let store: Arc<dyn ProductStore> = Arc::new(store);
    let app = catalog_api::app::build_app(store);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
