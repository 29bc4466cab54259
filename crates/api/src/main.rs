use std::sync::Arc;

use brickstore_api::app::{self, DynFileStore, DynProductStore, DynStockQueries};
use brickstore_infra::{
    InMemoryProductStore, InMemoryStockEntryStore, LocalFileStore, PostgresProductStore,
    PostgresStockEntryStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    brickstore_observability::init();

    let (products, stock): (DynProductStore, DynStockQueries) =
        match std::env::var("DATABASE_URL") {
            Ok(url) => {
                let pool = sqlx::PgPool::connect(&url).await?;
                let store = PostgresProductStore::new(pool.clone());
                store.ensure_schema().await?;
                tracing::info!("using postgres document store");
                (
                    Arc::new(store) as DynProductStore,
                    Arc::new(PostgresStockEntryStore::new(pool)) as DynStockQueries,
                )
            }
            Err(_) => {
                tracing::warn!("DATABASE_URL not set; falling back to in-memory storage");
                (
                    Arc::new(InMemoryProductStore::new()) as DynProductStore,
                    Arc::new(InMemoryStockEntryStore::new()) as DynStockQueries,
                )
            }
        };

    let upload_root = std::env::var("UPLOAD_ROOT").unwrap_or_else(|_| "public".to_string());
    let files: DynFileStore = Arc::new(LocalFileStore::new(upload_root));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "listening");

    let router = app::build_app(products, stock, files);
    axum::serve(listener, router).await?;
    Ok(())
}
