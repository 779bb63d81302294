//! Medshop sync server
//!
//! Imports the configured product documents in the background, reports
//! related products, and serves the catalog sync and storefront callback
//! endpoints.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use medshop_sync::{
    adapters::{Neo4jGraphStore, ShopifyClient},
    api::{build_router, AppState},
    config::AppConfig,
    import_then_report, GraphStore, TraceContext,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    medshop_sync::init_tracing();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    info!("Connecting to Neo4j at: {}", config.neo4j.uri);
    let graph_store: Arc<dyn GraphStore> = Arc::new(
        Neo4jGraphStore::connect(config.neo4j.clone())
            .await
            .context("Failed to connect to Neo4j")?,
    );

    if let Err(e) = graph_store
        .ensure_constraints(&TraceContext::for_operation("startup"))
        .await
    {
        warn!("Could not create graph constraints: {}", e);
    }

    let shopify = Arc::new(
        ShopifyClient::new(config.shopify.clone()).context("Failed to create Shopify client")?,
    );

    let import_store = graph_store.clone();
    let import_files = config.import_files.clone();
    tokio::spawn(async move {
        if let Err(e) = import_then_report(import_store, import_files).await {
            error!("Relation report failed: {}", e);
        }
    });

    let app = build_router(AppState {
        graph_store,
        catalog: shopify.clone(),
        auth: shopify,
    });

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server is running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
