use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound::{Excluded, Unbounded};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::data::{
    entities::{ProductNode, ProductRecord, ProductRef, ProductRelation},
    errors::GraphStoreError,
    trace_context::TraceContext,
};
use crate::traits::graph_store::GraphStore;

#[derive(Debug, Clone, Default)]
struct FakeGraph {
    products: BTreeMap<String, ProductNode>,
    attributes: BTreeSet<String>,
    // productId -> attribute names (HAS_ATTRIBUTE edges)
    links: BTreeMap<String, BTreeSet<String>>,
}

/// A fake implementation of GraphStore for testing.
/// Mirrors the MERGE semantics of the Neo4j adapter in memory so that
/// idempotency and relation rules can be checked without a database.
#[derive(Debug, Default)]
pub struct FakeGraphStore {
    graph: Mutex<FakeGraph>,
    failure: Mutex<Option<String>>,
}

impl FakeGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a product node with free-form properties, the way
    /// enriched datasets land in the graph outside the importer.
    pub fn seed_product(&self, node: ProductNode) {
        let mut graph = self.graph.lock();
        graph.links.entry(node.product_id.clone()).or_default();
        graph.products.insert(node.product_id.clone(), node);
    }

    /// Makes every subsequent operation fail with a query error.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.lock() = Some(message.into());
    }

    pub fn recover(&self) {
        *self.failure.lock() = None;
    }

    pub fn product_count(&self) -> usize {
        self.graph.lock().products.len()
    }

    pub fn attribute_count(&self) -> usize {
        self.graph.lock().attributes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.lock().links.values().map(BTreeSet::len).sum()
    }

    fn check_failure(&self) -> Result<(), GraphStoreError> {
        match self.failure.lock().as_ref() {
            Some(message) => Err(GraphStoreError::QueryError(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl GraphStore for FakeGraphStore {
    async fn ensure_constraints(&self, _trace_ctx: &TraceContext) -> Result<(), GraphStoreError> {
        self.check_failure()
    }

    async fn upsert_products(
        &self,
        _trace_ctx: &TraceContext,
        products: &[ProductRecord],
    ) -> Result<(), GraphStoreError> {
        self.check_failure()?;

        // Work on a copy and swap it in, so a batch lands all-or-nothing.
        let mut graph = self.graph.lock();
        let mut next = graph.clone();
        for product in products {
            let id = product.product_id.as_str().to_string();
            let node = next
                .products
                .entry(id.clone())
                .or_insert_with(|| ProductNode::new(id.clone()));
            node.name = Some(product.name.clone());
            node.price = product.price;

            let names = product.attribute_names();
            next.attributes.extend(names.iter().cloned());
            next.links.entry(id).or_default().extend(names);
        }
        *graph = next;
        Ok(())
    }

    async fn product_relations(
        &self,
        _trace_ctx: &TraceContext,
    ) -> Result<Vec<ProductRelation>, GraphStoreError> {
        self.check_failure()?;

        let graph = self.graph.lock();
        let product_ref = |id: &String| ProductRef {
            product_id: id.clone(),
            name: graph.products.get(id).and_then(|p| p.name.clone()),
        };

        let mut relations = Vec::new();
        for (left_id, left_attrs) in &graph.links {
            for (right_id, right_attrs) in graph.links.range::<String, _>((Excluded(left_id), Unbounded)) {
                let shared: Vec<String> = left_attrs.intersection(right_attrs).cloned().collect();
                if !shared.is_empty() {
                    relations.push(ProductRelation {
                        left: product_ref(left_id),
                        right: product_ref(right_id),
                        shared_attributes: shared,
                    });
                }
            }
        }
        Ok(relations)
    }

    async fn list_products(&self, _trace_ctx: &TraceContext) -> Result<Vec<ProductNode>, GraphStoreError> {
        self.check_failure()?;
        Ok(self.graph.lock().products.values().cloned().collect())
    }

    async fn count_nodes(&self, _trace_ctx: &TraceContext) -> Result<i64, GraphStoreError> {
        self.check_failure()?;
        let graph = self.graph.lock();
        Ok((graph.products.len() + graph.attributes.len()) as i64)
    }
}
