//! In-memory fakes of the external services, used by unit and routing tests
//! in place of Neo4j and the storefront.

pub mod fake_graph_store;
pub mod fake_storefront;

pub use fake_graph_store::FakeGraphStore;
pub use fake_storefront::{CatalogCall, FakeStorefront};
