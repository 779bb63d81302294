//! Configuration for the Medshop sync server
//!
//! Values come from environment variables (after `.env` is loaded by the
//! binary). Numeric values that fail to parse are reported and replaced by
//! their defaults.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::adapters::{Neo4jConfig, ShopifyConfig};
use crate::data::CoreError;

const DEFAULT_IMPORT_FILES: [&str; 2] = [
    "datasets/products_sample_01.json",
    "datasets/products_sample_02.json",
];

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub neo4j: Neo4jConfig,
    pub shopify: ShopifyConfig,
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Product documents imported at startup
    pub import_files: Vec<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            neo4j: Neo4jConfig::default(),
            shopify: ShopifyConfig::default(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            import_files: DEFAULT_IMPORT_FILES.iter().map(PathBuf::from).collect(),
        }
    }
}

fn parse_or_keep<T: FromStr>(key: &str, raw: Option<String>, target: &mut T) {
    if let Some(raw) = raw {
        match raw.trim().parse::<T>() {
            Ok(value) => *target = value,
            Err(_) => warn!("Invalid {} value: {}", key, raw),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(uri) = non_empty("NEO4J_URI") {
            config.neo4j.uri = uri;
        }
        if let Some(username) = non_empty("NEO4J_USERNAME") {
            config.neo4j.username = username;
        }
        if let Some(password) = lookup("NEO4J_PASSWORD") {
            config.neo4j.password = password;
        }
        config.neo4j.database = non_empty("NEO4J_DATABASE");
        parse_or_keep("NEO4J_POOL_SIZE", lookup("NEO4J_POOL_SIZE"), &mut config.neo4j.pool_size);

        config.shopify.shop_name = non_empty("SHOPIFY_SHOP_NAME")
            .ok_or_else(|| CoreError::Config("SHOPIFY_SHOP_NAME is not set".to_string()))?;
        if let Some(token) = lookup("SHOPIFY_ACCESS_TOKEN") {
            config.shopify.access_token = token;
        }
        if let Some(version) = non_empty("SHOPIFY_API_VERSION") {
            config.shopify.api_version = version;
        }
        config.shopify.api_key = non_empty("SHOPIFY_API_KEY");
        config.shopify.api_secret = non_empty("SHOPIFY_API_SECRET");
        config.shopify.base_url = non_empty("SHOPIFY_BASE_URL");
        parse_or_keep(
            "SHOPIFY_TIMEOUT_SECS",
            lookup("SHOPIFY_TIMEOUT_SECS"),
            &mut config.shopify.timeout_secs,
        );

        if let Some(host) = non_empty("SERVER_HOST") {
            config.host = host;
        }
        parse_or_keep("SERVER_PORT", lookup("SERVER_PORT"), &mut config.port);

        if let Some(files) = non_empty("PRODUCT_IMPORT_FILES") {
            config.import_files = files
                .split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(PathBuf::from)
                .collect();
        }

        Ok(config)
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
