use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument};

use medshop_interfaces::{StorefrontCatalog, StorefrontProduct};

use crate::{
    data::{CoreError, ProductNode, TraceContext},
    services::mapping::to_storefront_product,
    traits::GraphStore,
};

/// Outcome of one catalog synchronization run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    /// Product nodes that were pushed, as read from the graph
    pub products: Vec<ProductNode>,
}

/// Pushes every product node in the graph to the storefront catalog.
pub struct CatalogSyncService {
    graph_store: Arc<dyn GraphStore>,
    catalog: Arc<dyn StorefrontCatalog>,
}

impl CatalogSyncService {
    pub fn new(graph_store: Arc<dyn GraphStore>, catalog: Arc<dyn StorefrontCatalog>) -> Self {
        Self {
            graph_store,
            catalog,
        }
    }

    /// Creates or updates one remote product per graph product.
    ///
    /// Remote products are matched by exact title against a single listing
    /// taken before the first write. The first failing call aborts the run.
    #[instrument(skip(self, trace_ctx), fields(trace_id = %trace_ctx.trace_id))]
    pub async fn sync(&self, trace_ctx: &TraceContext) -> Result<SyncReport, CoreError> {
        let products = self.graph_store.list_products(trace_ctx).await?;
        if products.is_empty() {
            debug!("No products in graph, skipping storefront sync");
            return Ok(SyncReport::default());
        }

        let submissions: Vec<StorefrontProduct> =
            products.iter().map(to_storefront_product).collect();
        let existing = self.catalog.list_products().await?;

        let mut report = SyncReport::default();
        for submission in &submissions {
            match existing.iter().find(|remote| remote.title == submission.title) {
                Some(remote) => {
                    debug!(remote_id = remote.id, title = %submission.title, "Updating remote product");
                    self.catalog.update_product(remote.id, submission).await?;
                    report.updated += 1;
                }
                None => {
                    debug!(title = %submission.title, "Creating remote product");
                    self.catalog.create_product(submission).await?;
                    report.created += 1;
                }
            }
        }

        info!(
            created = report.created,
            updated = report.updated,
            "Storefront catalog synchronized"
        );
        report.products = products;
        Ok(report)
    }
}
