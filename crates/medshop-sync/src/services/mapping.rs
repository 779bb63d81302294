//! Mapping from graph product nodes to storefront submissions

use medshop_interfaces::{ProductImage, StorefrontProduct};

use crate::data::ProductNode;

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Builds the storefront representation of a product node.
///
/// The title falls back from the curated title to the imported name and
/// finally to the product id, so every submission carries a title.
pub fn to_storefront_product(node: &ProductNode) -> StorefrontProduct {
    let title = non_blank(&node.title)
        .or_else(|| non_blank(&node.name))
        .unwrap_or(node.product_id.as_str())
        .to_string();

    let tags: Vec<String> = node
        .tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();

    StorefrontProduct {
        title,
        body_html: non_blank(&node.description).map(str::to_string),
        images: non_blank(&node.image).map(|src| {
            vec![ProductImage {
                src: src.to_string(),
            }]
        }),
        tags: if tags.is_empty() { None } else { Some(tags) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_node_maps_every_field() {
        let node = ProductNode {
            title: Some("Nitrile Gloves (100)".to_string()),
            name: Some("Gloves".to_string()),
            description: Some("<p>Powder free</p>".to_string()),
            image: Some("https://cdn.example.com/gloves.png".to_string()),
            tags: vec!["ppe".to_string(), " ".to_string(), "latex-free".to_string()],
            ..ProductNode::new("p-1")
        };

        let product = to_storefront_product(&node);

        assert_eq!(product.title, "Nitrile Gloves (100)");
        assert_eq!(product.body_html.as_deref(), Some("<p>Powder free</p>"));
        assert_eq!(
            product.images,
            Some(vec![ProductImage {
                src: "https://cdn.example.com/gloves.png".to_string()
            }])
        );
        assert_eq!(
            product.tags,
            Some(vec!["ppe".to_string(), "latex-free".to_string()])
        );
    }

    #[test]
    fn test_title_falls_back_to_name_then_id() {
        let named = ProductNode {
            name: Some("Thermometer".to_string()),
            title: Some("   ".to_string()),
            ..ProductNode::new("p-2")
        };
        assert_eq!(to_storefront_product(&named).title, "Thermometer");

        let bare = ProductNode::new("p-3");
        let product = to_storefront_product(&bare);
        assert_eq!(product.title, "p-3");
        assert!(product.body_html.is_none());
        assert!(product.images.is_none());
        assert!(product.tags.is_none());
    }
}
