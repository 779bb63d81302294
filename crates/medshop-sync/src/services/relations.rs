use std::sync::Arc;

use tracing::{info, instrument};

use crate::{
    data::{CoreError, ProductRelation, TraceContext},
    traits::GraphStore,
};

/// Reports pairs of products that share attributes.
pub struct RelationReporter {
    graph_store: Arc<dyn GraphStore>,
}

impl RelationReporter {
    pub fn new(graph_store: Arc<dyn GraphStore>) -> Self {
        Self { graph_store }
    }

    /// Queries the graph for related products and logs each pair.
    #[instrument(skip(self, trace_ctx), fields(trace_id = %trace_ctx.trace_id))]
    pub async fn report(&self, trace_ctx: &TraceContext) -> Result<Vec<ProductRelation>, CoreError> {
        let relations = self.graph_store.product_relations(trace_ctx).await?;

        info!(pairs = relations.len(), "Product relationships");
        for relation in &relations {
            info!(
                left = %relation.left.product_id,
                left_name = relation.left.name.as_deref().unwrap_or_default(),
                right = %relation.right.product_id,
                right_name = relation.right.name.as_deref().unwrap_or_default(),
                shared = ?relation.shared_attributes,
                "Related products"
            );
        }
        Ok(relations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AttributeRecord, ProductId, ProductRecord};
    use crate::test_utils::FakeGraphStore;
    use pretty_assertions::assert_eq;

    fn record(id: &str, attributes: &[&str]) -> ProductRecord {
        ProductRecord {
            product_id: ProductId::new(id),
            name: id.to_uppercase(),
            price: None,
            attributes: attributes
                .iter()
                .map(|name| AttributeRecord {
                    name: name.to_string(),
                })
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_each_pair_reported_once_with_sorted_attributes() {
        let store = Arc::new(FakeGraphStore::new());
        let trace_ctx = TraceContext::for_operation("test");
        store
            .upsert_products(
                &trace_ctx,
                &[
                    record("b", &["sterile", "cotton"]),
                    record("a", &["cotton", "sterile", "latex"]),
                    record("c", &["steel"]),
                ],
            )
            .await
            .unwrap();

        let relations = RelationReporter::new(store).report(&trace_ctx).await.unwrap();

        assert_eq!(relations.len(), 1);
        assert_eq!(relations[0].left.product_id, "a");
        assert_eq!(relations[0].left.name.as_deref(), Some("A"));
        assert_eq!(relations[0].right.product_id, "b");
        assert_eq!(relations[0].shared_attributes, vec!["cotton", "sterile"]);
    }

    #[tokio::test]
    async fn test_no_shared_attributes_no_pairs() {
        let store = Arc::new(FakeGraphStore::new());
        let trace_ctx = TraceContext::for_operation("test");
        store
            .upsert_products(&trace_ctx, &[record("a", &["x"]), record("b", &["y"])])
            .await
            .unwrap();

        let relations = RelationReporter::new(store).report(&trace_ctx).await.unwrap();
        assert!(relations.is_empty());
    }
}
