//! Storefront catalog interfaces for Medshop
//!
//! This module defines the request/response shapes exchanged with the remote
//! storefront platform and the traits the sync service uses to talk to it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Result type for storefront operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors that can occur when interacting with the storefront platform
#[derive(Error, Debug, Clone)]
pub enum CatalogError {
    /// Error communicating with the storefront (timeouts, refused connections)
    #[error("Communication error: {0}")]
    CommunicationError(String),

    /// The access token or OAuth credentials were rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The requested remote resource does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The storefront refused the submitted payload
    #[error("Rejected by storefront: {0}")]
    Rejected(String),

    /// Error during serialization or deserialization
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Any other storefront failure
    #[error("Internal storefront error: {0}")]
    InternalError(String),
}

/// Image attached to a storefront product submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Public URL of the image
    pub src: String,
}

/// Product representation submitted to the storefront on create/update.
/// Outbound only: the tag list is flattened into the storefront's
/// comma separated form and is never read back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorefrontProduct {
    /// Display title; also the reconciliation key against the remote catalog
    pub title: String,

    /// HTML description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,

    /// Optional images, only sent when the source product carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ProductImage>>,

    /// Optional tags, sent as the comma separated list the storefront expects
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_tags")]
    pub tags: Option<Vec<String>>,
}

fn serialize_tags<S>(tags: &Option<Vec<String>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match tags {
        Some(tags) => serializer.serialize_str(&tags.join(", ")),
        None => serializer.serialize_none(),
    }
}

/// Product as it currently exists on the remote catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteProduct {
    /// Storefront-assigned numeric identifier
    pub id: u64,

    /// Display title
    pub title: String,

    /// HTML description
    #[serde(default)]
    pub body_html: Option<String>,

    /// Comma separated tag list as returned by the storefront
    #[serde(default)]
    pub tags: String,

    /// Creation timestamp
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// Last updated timestamp
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Access token granted by the OAuth code exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// The offline access token
    pub access_token: String,

    /// Scopes granted to the token
    #[serde(default)]
    pub scope: String,
}

/// Read/write access to the storefront product catalog
#[async_trait]
pub trait StorefrontCatalog: Send + Sync {
    /// Lists the products currently on the remote catalog (first page only)
    async fn list_products(&self) -> CatalogResult<Vec<RemoteProduct>>;

    /// Creates a new remote product
    async fn create_product(&self, product: &StorefrontProduct) -> CatalogResult<RemoteProduct>;

    /// Replaces the fields of an existing remote product
    async fn update_product(
        &self,
        id: u64,
        product: &StorefrontProduct,
    ) -> CatalogResult<RemoteProduct>;
}

/// OAuth authorization-code exchange against the storefront platform
#[async_trait]
pub trait StorefrontAuth: Send + Sync {
    /// Exchanges an authorization `code` issued for `shop` for an access token
    async fn exchange_access_token(&self, shop: &str, code: &str) -> CatalogResult<AccessToken>;
}
