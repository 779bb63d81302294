//! Error types for the Medshop product sync service

use std::path::PathBuf;
use thiserror::Error;

use medshop_interfaces::CatalogError;

/// Base Error type for core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to read import file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid import document {path:?}: {source}")]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Graph store error: {0}")]
    GraphStore(#[from] GraphStoreError),

    #[error("Storefront error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Specific error type for the graph store (Neo4j interaction).
#[derive(Error, Debug)]
pub enum GraphStoreError {
    #[error("Graph database connection error: {0}")]
    ConnectionError(String),
    #[error("Graph query execution error: {0}")]
    QueryError(String),
    #[error("Data mapping error from graph result: {0}")]
    MappingError(String),
    #[error("Transaction error: {0}")]
    TransactionError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_store_error_display() {
        let error = GraphStoreError::ConnectionError("connection failed".into());
        assert_eq!(format!("{}", error), "Graph database connection error: connection failed");
    }

    #[test]
    fn test_core_error_wraps_graph_store_error() {
        let error: CoreError = GraphStoreError::QueryError("syntax".into()).into();
        assert_eq!(
            format!("{}", error),
            "Graph store error: Graph query execution error: syntax"
        );
    }

    #[test]
    fn test_core_error_wraps_catalog_error() {
        let error: CoreError = CatalogError::NotFound("product 1".into()).into();
        assert!(matches!(error, CoreError::Catalog(CatalogError::NotFound(_))));
    }

    #[test]
    fn test_invalid_document_mentions_path() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = CoreError::InvalidDocument { path: PathBuf::from("products.json"), source };
        assert!(format!("{}", error).contains("products.json"));
    }
}
