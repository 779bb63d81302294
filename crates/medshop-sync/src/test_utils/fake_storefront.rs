use async_trait::async_trait;
use parking_lot::Mutex;

use medshop_interfaces::{
    AccessToken, CatalogError, CatalogResult, RemoteProduct, StorefrontAuth, StorefrontCatalog,
    StorefrontProduct,
};

/// A storefront call observed by [`FakeStorefront`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCall {
    List,
    Create { title: String },
    Update { id: u64, title: String },
    ExchangeToken { shop: String },
}

#[derive(Debug, Default)]
struct FakeCatalog {
    products: Vec<RemoteProduct>,
    calls: Vec<CatalogCall>,
    next_id: u64,
}

/// In-memory storefront that records every call it receives.
#[derive(Debug, Default)]
pub struct FakeStorefront {
    catalog: Mutex<FakeCatalog>,
    failure: Mutex<Option<CatalogError>>,
    token: Mutex<Option<AccessToken>>,
}

impl FakeStorefront {
    pub fn new() -> Self {
        let storefront = Self::default();
        storefront.catalog.lock().next_id = 1000;
        storefront
    }

    /// Adds a product that already exists on the remote catalog.
    pub fn with_remote_product(self, id: u64, title: &str) -> Self {
        self.catalog.lock().products.push(RemoteProduct {
            id,
            title: title.to_string(),
            body_html: None,
            tags: String::new(),
            created_at: None,
            updated_at: None,
        });
        self
    }

    /// Token handed out by the OAuth exchange; without one the exchange fails.
    pub fn with_token(self, access_token: &str, scope: &str) -> Self {
        *self.token.lock() = Some(AccessToken {
            access_token: access_token.to_string(),
            scope: scope.to_string(),
        });
        self
    }

    /// Makes every subsequent catalog call fail with `error`.
    pub fn fail_with(&self, error: CatalogError) {
        *self.failure.lock() = Some(error);
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.catalog.lock().calls.clone()
    }

    pub fn remote_products(&self) -> Vec<RemoteProduct> {
        self.catalog.lock().products.clone()
    }

    fn check_failure(&self) -> CatalogResult<()> {
        match self.failure.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl StorefrontCatalog for FakeStorefront {
    async fn list_products(&self) -> CatalogResult<Vec<RemoteProduct>> {
        self.catalog.lock().calls.push(CatalogCall::List);
        self.check_failure()?;
        Ok(self.remote_products())
    }

    async fn create_product(&self, product: &StorefrontProduct) -> CatalogResult<RemoteProduct> {
        self.catalog.lock().calls.push(CatalogCall::Create {
            title: product.title.clone(),
        });
        self.check_failure()?;

        let mut catalog = self.catalog.lock();
        catalog.next_id += 1;
        let created = RemoteProduct {
            id: catalog.next_id,
            title: product.title.clone(),
            body_html: product.body_html.clone(),
            tags: product.tags.clone().unwrap_or_default().join(", "),
            created_at: None,
            updated_at: None,
        };
        catalog.products.push(created.clone());
        Ok(created)
    }

    async fn update_product(
        &self,
        id: u64,
        product: &StorefrontProduct,
    ) -> CatalogResult<RemoteProduct> {
        self.catalog.lock().calls.push(CatalogCall::Update {
            id,
            title: product.title.clone(),
        });
        self.check_failure()?;

        let mut catalog = self.catalog.lock();
        let existing = catalog
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::NotFound(format!("product {}", id)))?;
        existing.title = product.title.clone();
        existing.body_html = product.body_html.clone();
        existing.tags = product.tags.clone().unwrap_or_default().join(", ");
        Ok(existing.clone())
    }
}

#[async_trait]
impl StorefrontAuth for FakeStorefront {
    async fn exchange_access_token(&self, shop: &str, _code: &str) -> CatalogResult<AccessToken> {
        self.catalog.lock().calls.push(CatalogCall::ExchangeToken {
            shop: shop.to_string(),
        });
        self.check_failure()?;

        self.token
            .lock()
            .clone()
            .ok_or_else(|| CatalogError::Unauthorized("authorization code rejected".to_string()))
    }
}
