//! Core services for the Medshop product sync

pub mod catalog_sync;
pub mod importer;
pub mod mapping;
pub mod relations;

// Re-exports
pub use catalog_sync::{CatalogSyncService, SyncReport};
pub use importer::{ImportOutcome, ImportService};
pub use relations::RelationReporter;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use crate::data::{CoreError, ProductRelation, TraceContext};
use crate::traits::GraphStore;

/// Startup routine: imports every file concurrently, waits for all of them,
/// then reports product relations over whatever landed in the graph.
pub async fn import_then_report(
    graph_store: Arc<dyn GraphStore>,
    paths: Vec<PathBuf>,
) -> Result<Vec<ProductRelation>, CoreError> {
    let trace_ctx = TraceContext::for_operation("startup_import");

    let outcomes = ImportService::new(graph_store.clone())
        .import_all(&paths, &trace_ctx)
        .await;
    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    if failed > 0 {
        warn!(failed, total = outcomes.len(), "Some product documents failed to import");
    } else {
        info!(files = outcomes.len(), "All product documents imported");
    }

    RelationReporter::new(graph_store)
        .report(&trace_ctx.child("relation_report"))
        .await
}
