//! Core traits (interfaces) for the product graph

pub mod graph_store;

pub use graph_store::GraphStore;
