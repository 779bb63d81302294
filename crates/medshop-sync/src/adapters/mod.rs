//! Adapters implementation for external services

pub mod neo4j_store;
pub mod shopify_client;

// Re-export adapters for easier import
pub use neo4j_store::{Neo4jConfig, Neo4jGraphStore};
pub use shopify_client::{ShopifyClient, ShopifyConfig};
