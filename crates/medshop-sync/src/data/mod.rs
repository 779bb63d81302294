//! Core data structures for the product graph

pub mod identifiers;
pub mod trace_context;
pub mod entities;
pub mod errors;

// Re-export all common types
pub use identifiers::ProductId;
pub use trace_context::TraceContext;
pub use errors::{CoreError, GraphStoreError};
pub use entities::*;
