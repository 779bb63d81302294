//! Medshop product graph importer and storefront catalog sync

// Core modules
pub mod data;
pub mod traits;
pub mod services;

// Implementation adapters (optional, can be provided externally)
#[cfg(feature = "adapters")]
pub mod adapters;

#[cfg(feature = "adapters")]
pub mod config;

#[cfg(feature = "api-server")]
pub mod api;

// In-memory fakes, shared with the integration tests
pub mod test_utils;

// Re-export key types for convenient usage
pub use data::errors::{CoreError, GraphStoreError};
pub use data::identifiers::ProductId;
pub use data::trace_context::TraceContext;
pub use data::entities::{
    AttributeRecord, ImportSummary, ProductDocument, ProductNode, ProductRecord, ProductRef,
    ProductRelation,
};

// Re-export core traits
pub use traits::GraphStore;

// Re-export core services
pub use services::{
    import_then_report, CatalogSyncService, ImportOutcome, ImportService, RelationReporter,
    SyncReport,
};

const DEFAULT_LOG_FILTER: &str = "medshop_sync=info,tower_http=info";

/// Initialize tracing for the sync server.
///
/// `RUST_LOG` overrides the default filter; `LOG_FORMAT=json` switches to
/// structured output. Calling this more than once is a no-op.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
