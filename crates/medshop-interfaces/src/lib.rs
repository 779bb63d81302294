//! Medshop Interfaces
//!
//! This crate provides the interface types shared between the product sync
//! service and the storefront platform adapters.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Storefront catalog interfaces
pub mod catalog;

/// Re-export key types for convenient usage
pub use catalog::{
    AccessToken, CatalogError, CatalogResult, ProductImage, RemoteProduct,
    StorefrontAuth, StorefrontCatalog, StorefrontProduct,
};
