use async_trait::async_trait;
use neo4rs::{query, BoltNull, BoltType, ConfigBuilder, Graph, Query, Row};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    data::{
        entities::{ProductNode, ProductRecord, ProductRef, ProductRelation},
        errors::GraphStoreError,
        trace_context::TraceContext,
    },
    traits::graph_store::GraphStore,
};

const PRODUCT_CONSTRAINT: &str =
    "CREATE CONSTRAINT product_id_unique IF NOT EXISTS FOR (p:Product) REQUIRE p.productId IS UNIQUE";

const ATTRIBUTE_CONSTRAINT: &str =
    "CREATE CONSTRAINT attribute_name_unique IF NOT EXISTS FOR (a:Attribute) REQUIRE a.name IS UNIQUE";

// UNWIND over an empty list yields no rows, so the product MERGE/SET above it
// still applies for products without attributes.
const UPSERT_PRODUCT: &str = "
    MERGE (p:Product {productId: $product_id})
    SET p.name = $name, p.price = $price
    WITH p
    UNWIND $attributes AS attribute_name
    MERGE (a:Attribute {name: attribute_name})
    MERGE (p)-[:HAS_ATTRIBUTE]->(a)
";

const PRODUCT_RELATIONS: &str = "
    MATCH (p1:Product)-[:HAS_ATTRIBUTE]->(a:Attribute)<-[:HAS_ATTRIBUTE]-(p2:Product)
    WHERE toString(p1.productId) < toString(p2.productId)
    WITH p1, p2, collect(DISTINCT a.name) AS shared
    RETURN toString(p1.productId) AS left_id, p1.name AS left_name,
           toString(p2.productId) AS right_id, p2.name AS right_name,
           shared
    ORDER BY left_id, right_id
";

// Nodes without a productId cannot be keyed and are left out of the sync.
const LIST_PRODUCTS: &str = "
    MATCH (p:Product)
    WHERE p.productId IS NOT NULL
    RETURN toString(p.productId) AS product_id,
           p.name AS name,
           toFloat(p.price) AS price,
           coalesce(p.prod_title, p.title) AS title,
           coalesce(p.meta_description, p.description) AS description,
           coalesce(p.image, p.schema_image) AS image,
           p.tags AS tags
    ORDER BY product_id
";

const COUNT_NODES: &str = "MATCH (n) RETURN count(n) AS count";

/// Configuration for Neo4j connection
#[derive(Debug, Clone)]
pub struct Neo4jConfig {
    pub uri: String,
    pub username: String,
    pub password: String,
    pub database: Option<String>,
    pub pool_size: usize,
    pub fetch_size: usize,
    pub connection_retry_count: u32,
    pub connection_retry_delay: Duration,
}

impl Default for Neo4jConfig {
    fn default() -> Self {
        Self {
            uri: "neo4j://localhost:7687".to_string(),
            username: "neo4j".to_string(),
            password: "password".to_string(),
            database: None,
            pool_size: 16,
            fetch_size: 200,
            connection_retry_count: 3,
            connection_retry_delay: Duration::from_secs(2),
        }
    }
}

/// Neo4j implementation of the `GraphStore` trait.
///
/// Every operation checks a connection out of the driver pool for its own
/// duration and returns it when the operation completes or fails.
#[derive(Clone)]
pub struct Neo4jGraphStore {
    graph: Arc<Graph>,
}

impl Neo4jGraphStore {
    /// Connects to Neo4j, retrying the initial handshake
    /// `connection_retry_count` times.
    pub async fn connect(config: Neo4jConfig) -> Result<Self, GraphStoreError> {
        let mut config_builder = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.username)
            .password(&config.password)
            .max_connections(config.pool_size)
            .fetch_size(config.fetch_size);

        if let Some(db) = &config.database {
            config_builder = config_builder.db(db.as_str());
        }

        let neo4j_config = config_builder.build().map_err(|e| {
            GraphStoreError::ConnectionError(format!("Failed to build Neo4j config: {}", e))
        })?;

        let attempts = config.connection_retry_count.max(1);
        let mut last_error = None;
        for attempt in 1..=attempts {
            match Graph::connect(neo4j_config.clone()).await {
                Ok(graph) => {
                    // The pool is lazy; force a real bolt handshake before reporting success.
                    match graph.run(query("RETURN 1")).await {
                        Ok(()) => {
                            info!("Connected to Neo4j at {} (attempt {})", config.uri, attempt);
                            return Ok(Self {
                                graph: Arc::new(graph),
                            });
                        }
                        Err(e) => {
                            error!("Neo4j connection test failed (attempt {}): {}", attempt, e);
                            last_error = Some(e.to_string());
                        }
                    }
                }
                Err(e) => {
                    error!("Failed to connect to Neo4j (attempt {}): {}", attempt, e);
                    last_error = Some(e.to_string());
                }
            }

            if attempt < attempts {
                tokio::time::sleep(config.connection_retry_delay).await;
            }
        }

        Err(GraphStoreError::ConnectionError(format!(
            "Failed to connect to Neo4j at {} after {} attempts. Last error: {}",
            config.uri,
            attempts,
            last_error.unwrap_or_else(|| "unknown".to_string())
        )))
    }

    async fn fetch_rows(&self, q: Query) -> Result<Vec<Row>, GraphStoreError> {
        let mut result = self
            .graph
            .execute(q)
            .await
            .map_err(|e| GraphStoreError::QueryError(format!("Failed to execute query: {}", e)))?;

        let mut rows = Vec::new();
        loop {
            match result.next().await {
                Ok(Some(row)) => rows.push(row),
                Ok(None) => break,
                Err(e) => {
                    return Err(GraphStoreError::QueryError(format!(
                        "Failed to read result stream: {}",
                        e
                    )))
                }
            }
        }
        Ok(rows)
    }

    fn upsert_query(product: &ProductRecord) -> Query {
        let price = match product.price {
            Some(price) => BoltType::from(price),
            None => BoltType::Null(BoltNull),
        };

        query(UPSERT_PRODUCT)
            .param("product_id", product.product_id.as_str())
            .param("name", product.name.as_str())
            .param("price", price)
            .param("attributes", product.attribute_names())
    }
}

fn required<T: DeserializeOwned>(row: &Row, key: &str) -> Result<T, GraphStoreError> {
    row.get::<T>(key)
        .map_err(|e| GraphStoreError::MappingError(format!("Failed to read column '{}': {:?}", key, e)))
}

// Nulls and type mismatches on free-form properties read as absent.
fn optional<T: DeserializeOwned>(row: &Row, key: &str) -> Option<T> {
    row.get::<T>(key).ok()
}

#[async_trait]
impl GraphStore for Neo4jGraphStore {
    #[instrument(skip(self), fields(trace_id = %trace_ctx.trace_id))]
    async fn ensure_constraints(&self, trace_ctx: &TraceContext) -> Result<(), GraphStoreError> {
        for statement in [PRODUCT_CONSTRAINT, ATTRIBUTE_CONSTRAINT] {
            self.graph.run(query(statement)).await.map_err(|e| {
                GraphStoreError::QueryError(format!("Failed to create constraint: {}", e))
            })?;
        }
        debug!("Graph constraints in place");
        Ok(())
    }

    #[instrument(skip(self, products), fields(trace_id = %trace_ctx.trace_id, products = products.len()))]
    async fn upsert_products(
        &self,
        trace_ctx: &TraceContext,
        products: &[ProductRecord],
    ) -> Result<(), GraphStoreError> {
        let mut txn = self.graph.start_txn().await.map_err(|e| {
            GraphStoreError::TransactionError(format!("Failed to start transaction: {}", e))
        })?;

        for product in products {
            debug!(product_id = %product.product_id, "Upserting product");
            if let Err(e) = txn.run(Self::upsert_query(product)).await {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!("Rollback after failed upsert also failed: {}", rollback_err);
                }
                return Err(GraphStoreError::QueryError(format!(
                    "Failed to upsert product {}: {}",
                    product.product_id, e
                )));
            }
        }

        txn.commit().await.map_err(|e| {
            GraphStoreError::TransactionError(format!("Failed to commit transaction: {}", e))
        })
    }

    #[instrument(skip(self), fields(trace_id = %trace_ctx.trace_id))]
    async fn product_relations(
        &self,
        trace_ctx: &TraceContext,
    ) -> Result<Vec<ProductRelation>, GraphStoreError> {
        let rows = self.fetch_rows(query(PRODUCT_RELATIONS)).await?;

        rows.iter()
            .map(|row| {
                let mut shared: Vec<String> = required(row, "shared")?;
                shared.sort();
                shared.dedup();
                Ok(ProductRelation {
                    left: ProductRef {
                        product_id: required(row, "left_id")?,
                        name: optional(row, "left_name"),
                    },
                    right: ProductRef {
                        product_id: required(row, "right_id")?,
                        name: optional(row, "right_name"),
                    },
                    shared_attributes: shared,
                })
            })
            .collect()
    }

    #[instrument(skip(self), fields(trace_id = %trace_ctx.trace_id))]
    async fn list_products(&self, trace_ctx: &TraceContext) -> Result<Vec<ProductNode>, GraphStoreError> {
        let rows = self.fetch_rows(query(LIST_PRODUCTS)).await?;

        rows.iter()
            .map(|row| {
                Ok(ProductNode {
                    product_id: required(row, "product_id")?,
                    name: optional(row, "name"),
                    price: optional(row, "price"),
                    title: optional(row, "title"),
                    description: optional(row, "description"),
                    image: optional(row, "image"),
                    tags: optional(row, "tags").unwrap_or_default(),
                })
            })
            .collect()
    }

    #[instrument(skip(self), fields(trace_id = %trace_ctx.trace_id))]
    async fn count_nodes(&self, trace_ctx: &TraceContext) -> Result<i64, GraphStoreError> {
        let rows = self.fetch_rows(query(COUNT_NODES)).await?;
        match rows.first() {
            Some(row) => required(row, "count"),
            None => Ok(0),
        }
    }
}
