//! GraphStore trait definition for graph database interaction

use async_trait::async_trait;

use crate::data::{
    entities::{ProductNode, ProductRecord, ProductRelation},
    errors::GraphStoreError,
    trace_context::TraceContext,
};

/// Represents the interface for interacting with the product graph.
/// This abstracts the underlying database technology (e.g., Neo4j).
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Creates the uniqueness constraints on `Product.productId` and
    /// `Attribute.name` if they do not exist yet.
    async fn ensure_constraints(&self, trace_ctx: &TraceContext) -> Result<(), GraphStoreError>;

    /// Upserts products, their attributes and the `HAS_ATTRIBUTE` edges.
    ///
    /// Contract: the whole slice is written as one unit of work; on error
    /// nothing from this call is persisted. Re-running with the same records
    /// leaves node and edge counts unchanged.
    async fn upsert_products(
        &self,
        trace_ctx: &TraceContext,
        products: &[ProductRecord],
    ) -> Result<(), GraphStoreError>;

    /// Returns every pair of distinct products sharing at least one attribute,
    /// each pair once, ordered by `(left, right)` product id.
    async fn product_relations(
        &self,
        trace_ctx: &TraceContext,
    ) -> Result<Vec<ProductRelation>, GraphStoreError>;

    /// Reads all `Product` nodes, ordered by product id.
    async fn list_products(&self, trace_ctx: &TraceContext) -> Result<Vec<ProductNode>, GraphStoreError>;

    /// Total number of nodes of any label.
    async fn count_nodes(&self, trace_ctx: &TraceContext) -> Result<i64, GraphStoreError>;
}
