use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use tracing::{error, info, instrument};

use crate::{
    data::{CoreError, ImportSummary, ProductDocument, TraceContext},
    traits::GraphStore,
};

/// Result of importing one file as part of [`ImportService::import_all`]
#[derive(Debug)]
pub struct ImportOutcome {
    pub path: PathBuf,
    pub result: Result<ImportSummary, CoreError>,
}

impl ImportOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Service responsible for loading product documents into the graph.
/// Each document is parsed in full and then written as a single unit of work.
pub struct ImportService {
    graph_store: Arc<dyn GraphStore>,
}

impl ImportService {
    pub fn new(graph_store: Arc<dyn GraphStore>) -> Self {
        Self { graph_store }
    }

    /// Imports one JSON document. Any failure aborts this file only.
    #[instrument(skip(self, trace_ctx), fields(trace_id = %trace_ctx.trace_id))]
    pub async fn import_file(
        &self,
        path: &Path,
        trace_ctx: &TraceContext,
    ) -> Result<ImportSummary, CoreError> {
        let raw = tokio::fs::read(path).await.map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let document: ProductDocument =
            serde_json::from_slice(&raw).map_err(|source| CoreError::InvalidDocument {
                path: path.to_path_buf(),
                source,
            })?;

        self.graph_store
            .upsert_products(trace_ctx, &document.products)
            .await?;

        let summary = ImportSummary {
            path: path.to_path_buf(),
            products: document.products.len(),
            attribute_links: document
                .products
                .iter()
                .map(|p| p.attribute_names().len())
                .sum(),
        };

        info!(
            products = summary.products,
            attribute_links = summary.attribute_links,
            "Data imported from {}",
            path.display()
        );
        Ok(summary)
    }

    /// Imports every file concurrently and waits for all of them.
    /// Files are independent: one failing does not stop the others, and no
    /// ordering between them is guaranteed.
    pub async fn import_all(&self, paths: &[PathBuf], trace_ctx: &TraceContext) -> Vec<ImportOutcome> {
        let imports = paths.iter().map(|path| async move {
            let file_ctx = trace_ctx.child("import_file");
            let result = self.import_file(path, &file_ctx).await;
            if let Err(e) = &result {
                error!(
                    trace_id = %file_ctx.trace_id,
                    path = %path.display(),
                    error = %e,
                    "Failed to import product document"
                );
            }
            ImportOutcome {
                path: path.clone(),
                result,
            }
        });

        join_all(imports).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeGraphStore;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_document(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    const DOCUMENT: &str = r#"{
        "products": [
            { "productId": "p-1", "name": "Gauze", "price": 2.5,
              "attributes": [{ "name": "sterile" }, { "name": "cotton" }] },
            { "productId": "p-2", "name": "Swab", "price": 0.4,
              "attributes": [{ "name": "sterile" }] }
        ]
    }"#;

    #[tokio::test]
    async fn test_import_file_counts() {
        let store = Arc::new(FakeGraphStore::new());
        let service = ImportService::new(store.clone());
        let file = write_document(DOCUMENT);

        let summary = service
            .import_file(file.path(), &TraceContext::for_operation("test"))
            .await
            .unwrap();

        assert_eq!(summary.products, 2);
        assert_eq!(summary.attribute_links, 3);
        assert_eq!(store.product_count(), 2);
        assert_eq!(store.attribute_count(), 2);
    }

    #[tokio::test]
    async fn test_reimport_is_idempotent() {
        let store = Arc::new(FakeGraphStore::new());
        let service = ImportService::new(store.clone());
        let file = write_document(DOCUMENT);
        let trace_ctx = TraceContext::for_operation("test");

        service.import_file(file.path(), &trace_ctx).await.unwrap();
        let nodes_after_first = store.count_nodes(&trace_ctx).await.unwrap();
        let edges_after_first = store.edge_count();

        service.import_file(file.path(), &trace_ctx).await.unwrap();
        assert_eq!(store.count_nodes(&trace_ctx).await.unwrap(), nodes_after_first);
        assert_eq!(store.edge_count(), edges_after_first);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let service = ImportService::new(Arc::new(FakeGraphStore::new()));

        let result = service
            .import_file(Path::new("/nonexistent/products.json"), &TraceContext::for_operation("test"))
            .await;

        assert!(matches!(result, Err(CoreError::Io { .. })));
    }

    #[tokio::test]
    async fn test_malformed_document_writes_nothing() {
        let store = Arc::new(FakeGraphStore::new());
        let service = ImportService::new(store.clone());
        let file = write_document(r#"{ "products": [ { "name": "no id" } ] }"#);

        let result = service
            .import_file(file.path(), &TraceContext::for_operation("test"))
            .await;

        assert!(matches!(result, Err(CoreError::InvalidDocument { .. })));
        assert_eq!(store.product_count(), 0);
    }

    #[tokio::test]
    async fn test_import_all_isolates_failures() {
        let store = Arc::new(FakeGraphStore::new());
        let service = ImportService::new(store.clone());
        let good = write_document(DOCUMENT);
        let bad = write_document("not json");

        let outcomes = service
            .import_all(
                &[good.path().to_path_buf(), bad.path().to_path_buf()],
                &TraceContext::for_operation("test"),
            )
            .await;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_success());
        assert!(!outcomes[1].is_success());
        assert_eq!(store.product_count(), 2);
    }
}
