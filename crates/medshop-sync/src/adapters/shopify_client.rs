use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use medshop_interfaces::{
    AccessToken, CatalogError, CatalogResult, RemoteProduct, StorefrontAuth, StorefrontCatalog,
    StorefrontProduct,
};

/// Shopify access header carrying the Admin API token
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Configuration for the Shopify Admin REST client
#[derive(Debug, Clone)]
pub struct ShopifyConfig {
    /// Shop name (`my-shop`) or full domain (`my-shop.myshopify.com`)
    pub shop_name: String,
    /// Admin API access token
    pub access_token: String,
    /// Admin API version, e.g. `2021-10`
    pub api_version: String,
    /// OAuth client id, required only for the code exchange
    pub api_key: Option<String>,
    /// OAuth client secret, required only for the code exchange
    pub api_secret: Option<String>,
    /// Overrides `https://{shop}` for every request (tests, proxies)
    pub base_url: Option<String>,
    /// Timeout in seconds for HTTP requests
    pub timeout_secs: u64,
    /// Page size requested when listing products; only the first page is read
    pub page_limit: u32,
}

impl Default for ShopifyConfig {
    fn default() -> Self {
        Self {
            shop_name: String::new(),
            access_token: String::new(),
            api_version: "2021-10".to_string(),
            api_key: None,
            api_secret: None,
            base_url: None,
            timeout_secs: 30,
            page_limit: 250,
        }
    }
}

/// Client for the Shopify Admin REST API
#[derive(Debug, Clone)]
pub struct ShopifyClient {
    config: ShopifyConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ProductList {
    products: Vec<RemoteProduct>,
}

#[derive(Debug, Deserialize)]
struct ProductEnvelope {
    product: RemoteProduct,
}

#[derive(Debug, Serialize)]
struct ProductPayload<'a> {
    product: &'a StorefrontProduct,
}

#[derive(Debug, Serialize)]
struct ProductUpdate<'a> {
    id: u64,
    #[serde(flatten)]
    product: &'a StorefrontProduct,
}

#[derive(Debug, Serialize)]
struct ProductUpdatePayload<'a> {
    product: ProductUpdate<'a>,
}

#[derive(Debug, Serialize)]
struct AccessTokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    code: &'a str,
}

const SHOP_SUFFIX: &str = ".myshopify.com";

/// Turns `my-shop` into `my-shop.myshopify.com`. Anything other than a single
/// `[a-z0-9][a-z0-9-]*` label under `myshopify.com` is rejected.
fn shop_domain(shop: &str) -> CatalogResult<String> {
    let normalized = shop.trim().trim_end_matches('/').to_ascii_lowercase();
    let domain = if normalized.contains('.') {
        normalized
    } else {
        format!("{}{}", normalized, SHOP_SUFFIX)
    };

    let label = domain.strip_suffix(SHOP_SUFFIX).unwrap_or_default();
    let valid = label
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_lowercase() || c.is_ascii_digit())
        && label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid {
        return Err(CatalogError::Rejected(format!("Invalid shop domain: {}", shop)));
    }
    Ok(domain)
}

impl ShopifyClient {
    /// Creates a new ShopifyClient with the provided configuration
    pub fn new(config: ShopifyConfig) -> CatalogResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CatalogError::InternalError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn base_url_for(&self, shop: &str) -> CatalogResult<String> {
        let domain = shop_domain(shop)?;
        match &self.config.base_url {
            Some(url) => Ok(url.trim_end_matches('/').to_string()),
            None => Ok(format!("https://{}", domain)),
        }
    }

    fn admin_url(&self, resource: &str) -> CatalogResult<String> {
        Ok(format!(
            "{}/admin/api/{}/{}",
            self.base_url_for(&self.config.shop_name)?,
            self.config.api_version,
            resource
        ))
    }

    /// Maps an HTTP error to a CatalogError
    fn map_http_error(error: reqwest::Error) -> CatalogError {
        if error.is_timeout() {
            CatalogError::CommunicationError(format!("Request timeout: {}", error))
        } else if error.is_connect() {
            CatalogError::CommunicationError(format!("Connection error: {}", error))
        } else {
            CatalogError::InternalError(format!("HTTP error: {}", error))
        }
    }

    /// Passes 2xx responses through and maps everything else to a CatalogError
    async fn check_status(response: Response) -> CatalogResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| format!("HTTP error: {}", status));

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CatalogError::Unauthorized(body),
            StatusCode::NOT_FOUND => CatalogError::NotFound(body),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => CatalogError::Rejected(body),
            _ => CatalogError::InternalError(format!("{}: {}", status, body)),
        })
    }

    async fn parse<T: for<'de> Deserialize<'de>>(response: Response) -> CatalogResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::SerializationError(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl StorefrontCatalog for ShopifyClient {
    #[instrument(skip(self), fields(shop = %self.config.shop_name))]
    async fn list_products(&self) -> CatalogResult<Vec<RemoteProduct>> {
        let url = self.admin_url("products.json")?;
        debug!("Listing storefront products from {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCESS_TOKEN_HEADER, &self.config.access_token)
            .query(&[("limit", self.config.page_limit)])
            .send()
            .await
            .map_err(Self::map_http_error)?;

        let list: ProductList = Self::parse(Self::check_status(response).await?).await?;
        Ok(list.products)
    }

    #[instrument(skip(self, product), fields(shop = %self.config.shop_name, title = %product.title))]
    async fn create_product(&self, product: &StorefrontProduct) -> CatalogResult<RemoteProduct> {
        let url = self.admin_url("products.json")?;

        let response = self
            .client
            .post(&url)
            .header(ACCESS_TOKEN_HEADER, &self.config.access_token)
            .json(&ProductPayload { product })
            .send()
            .await
            .map_err(Self::map_http_error)?;

        let created: ProductEnvelope = Self::parse(Self::check_status(response).await?).await?;
        debug!(id = created.product.id, "Created storefront product");
        Ok(created.product)
    }

    #[instrument(skip(self, product), fields(shop = %self.config.shop_name, title = %product.title))]
    async fn update_product(
        &self,
        id: u64,
        product: &StorefrontProduct,
    ) -> CatalogResult<RemoteProduct> {
        let url = self.admin_url(&format!("products/{}.json", id))?;

        let response = self
            .client
            .put(&url)
            .header(ACCESS_TOKEN_HEADER, &self.config.access_token)
            .json(&ProductUpdatePayload {
                product: ProductUpdate { id, product },
            })
            .send()
            .await
            .map_err(Self::map_http_error)?;

        let updated: ProductEnvelope = Self::parse(Self::check_status(response).await?).await?;
        debug!(id = updated.product.id, "Updated storefront product");
        Ok(updated.product)
    }
}

#[async_trait]
impl StorefrontAuth for ShopifyClient {
    #[instrument(skip(self, code))]
    async fn exchange_access_token(&self, shop: &str, code: &str) -> CatalogResult<AccessToken> {
        let (client_id, client_secret) = match (&self.config.api_key, &self.config.api_secret) {
            (Some(key), Some(secret)) => (key.as_str(), secret.as_str()),
            _ => {
                return Err(CatalogError::Unauthorized(
                    "OAuth client credentials are not configured".to_string(),
                ))
            }
        };

        let url = format!("{}/admin/oauth/access_token", self.base_url_for(shop)?);
        let response = self
            .client
            .post(&url)
            .json(&AccessTokenRequest {
                client_id,
                client_secret,
                code,
            })
            .send()
            .await
            .map_err(Self::map_http_error)?;

        Self::parse(Self::check_status(response).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Helper function to start a mock server and create a client pointing to it
    async fn setup_test_client() -> (MockServer, ShopifyClient) {
        let mock_server = MockServer::start().await;
        let client = ShopifyClient::new(ShopifyConfig {
            shop_name: "medshop-test".to_string(),
            access_token: "shpat_test".to_string(),
            api_key: Some("client-id".to_string()),
            api_secret: Some("client-secret".to_string()),
            base_url: Some(mock_server.uri()),
            timeout_secs: 5,
            ..ShopifyConfig::default()
        })
        .unwrap();
        (mock_server, client)
    }

    fn gloves() -> StorefrontProduct {
        StorefrontProduct {
            title: "Nitrile Gloves".to_string(),
            body_html: Some("Box of 100".to_string()),
            images: None,
            tags: Some(vec!["gloves".to_string()]),
        }
    }

    #[test]
    fn test_shop_domain_normalization() {
        assert_eq!(shop_domain("medshop").unwrap(), "medshop.myshopify.com");
        assert_eq!(shop_domain("medshop.myshopify.com").unwrap(), "medshop.myshopify.com");
        assert_eq!(shop_domain("MedShop").unwrap(), "medshop.myshopify.com");
        assert!(shop_domain("evil.com/@attacker").is_err());
        assert!(shop_domain("").is_err());
    }

    #[test]
    fn test_shop_domain_rejects_foreign_hosts() {
        assert!(shop_domain("evil.com").is_err());
        assert!(shop_domain("attacker.example.org").is_err());
        assert!(shop_domain("x.myshopify.com.evil.com").is_err());
        assert!(shop_domain("a.b.myshopify.com").is_err());
        assert!(shop_domain(".myshopify.com").is_err());
        assert!(shop_domain("-shop").is_err());
    }

    #[tokio::test]
    async fn test_exchange_refuses_foreign_shop_before_sending() {
        let (mock_server, client) = setup_test_client().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let result = client.exchange_access_token("evil.com", "auth-code").await;
        assert!(matches!(result, Err(CatalogError::Rejected(_))));
    }

    #[test]
    fn test_admin_url_without_override() {
        let client = ShopifyClient::new(ShopifyConfig {
            shop_name: "medshop".to_string(),
            ..ShopifyConfig::default()
        })
        .unwrap();

        assert_eq!(
            client.admin_url("products.json").unwrap(),
            "https://medshop.myshopify.com/admin/api/2021-10/products.json"
        );
    }

    #[tokio::test]
    async fn test_list_products_sends_token() {
        let (mock_server, client) = setup_test_client().await;

        Mock::given(method("GET"))
            .and(path("/admin/api/2021-10/products.json"))
            .and(header(ACCESS_TOKEN_HEADER, "shpat_test"))
            .and(query_param("limit", "250"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "products": [
                    { "id": 1, "title": "Nitrile Gloves", "tags": "gloves" },
                    { "id": 2, "title": "Face Mask", "body_html": null }
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let products = client.list_products().await.unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].title, "Nitrile Gloves");
        assert_eq!(products[1].id, 2);
    }

    #[tokio::test]
    async fn test_create_product_wraps_payload() {
        let (mock_server, client) = setup_test_client().await;

        Mock::given(method("POST"))
            .and(path("/admin/api/2021-10/products.json"))
            .and(body_json(json!({
                "product": { "title": "Nitrile Gloves", "body_html": "Box of 100", "tags": "gloves" }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "product": { "id": 99, "title": "Nitrile Gloves" }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let created = client.create_product(&gloves()).await.unwrap();
        assert_eq!(created.id, 99);
    }

    #[tokio::test]
    async fn test_update_product_includes_id() {
        let (mock_server, client) = setup_test_client().await;

        Mock::given(method("PUT"))
            .and(path("/admin/api/2021-10/products/42.json"))
            .and(body_json(json!({
                "product": { "id": 42, "title": "Nitrile Gloves", "body_html": "Box of 100", "tags": "gloves" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "product": { "id": 42, "title": "Nitrile Gloves" }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let updated = client.update_product(42, &gloves()).await.unwrap();
        assert_eq!(updated.id, 42);
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let (mock_server, client) = setup_test_client().await;

        Mock::given(method("GET"))
            .and(path("/admin/api/2021-10/products.json"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key or access token"))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/admin/api/2021-10/products.json"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "errors": { "title": ["can't be blank"] }
            })))
            .mount(&mock_server)
            .await;

        assert!(matches!(
            client.list_products().await,
            Err(CatalogError::Unauthorized(_))
        ));
        assert!(matches!(
            client.create_product(&gloves()).await,
            Err(CatalogError::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_exchange_access_token() {
        let (mock_server, client) = setup_test_client().await;

        Mock::given(method("POST"))
            .and(path("/admin/oauth/access_token"))
            .and(body_json(json!({
                "client_id": "client-id",
                "client_secret": "client-secret",
                "code": "auth-code"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "shpat_new",
                "scope": "write_products"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let token = client
            .exchange_access_token("medshop-test", "auth-code")
            .await
            .unwrap();
        assert_eq!(token.access_token, "shpat_new");
        assert_eq!(token.scope, "write_products");
    }

    #[tokio::test]
    async fn test_exchange_requires_client_credentials() {
        let client = ShopifyClient::new(ShopifyConfig {
            shop_name: "medshop".to_string(),
            ..ShopifyConfig::default()
        })
        .unwrap();

        let result = client.exchange_access_token("medshop", "code").await;
        assert!(matches!(result, Err(CatalogError::Unauthorized(_))));
    }
}
