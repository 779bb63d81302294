//! Entity types for the product graph

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::data::identifiers::ProductId;

/// Attribute entry inside an import document product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeRecord {
    pub name: String,
}

/// Product entry of an import document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub attributes: Vec<AttributeRecord>,
}

impl ProductRecord {
    /// Attribute names to link, trimmed, without blanks or duplicates.
    pub fn attribute_names(&self) -> Vec<String> {
        self.attributes
            .iter()
            .map(|a| a.name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Import document: `{ "products": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDocument {
    pub products: Vec<ProductRecord>,
}

/// Node: `Product` as read back from the graph at sync time.
///
/// `title`, `description`, `image` and `tags` are free-form properties that
/// the importer never writes; they are present only when loaded by other
/// means (e.g. enriched datasets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ProductNode {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            name: None,
            price: None,
            title: None,
            description: None,
            image: None,
            tags: Vec::new(),
        }
    }
}

/// Lightweight reference to a product inside a relation report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub product_id: String,
    pub name: Option<String>,
}

/// Two distinct products sharing at least one attribute.
///
/// `left.product_id < right.product_id` always holds, so a pair is reported
/// once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRelation {
    pub left: ProductRef,
    pub right: ProductRef,
    pub shared_attributes: Vec<String>,
}

/// Outcome of importing one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub path: PathBuf,
    pub products: usize,
    pub attribute_links: usize,
}
