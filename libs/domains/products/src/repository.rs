use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use crate::error::{ProductError, ProductResult};
use crate::models::{Product, ProductSortField};
use crate::pagination::PageRequest;

/// Persistence contract for products.
///
/// Listing methods validate the [`PageRequest`] and reject unknown sort fields.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert `product` (its id is ignored) and return it with the assigned id.
    async fn create(&self, product: Product) -> ProductResult<Product>;

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>>;

    /// Overwrite name and price of the row with `product.id`.
    ///
    /// Fails with [`ProductError::NotFound`] if there is no such row.
    async fn update(&self, product: Product) -> ProductResult<Product>;

    /// Returns whether a row was deleted.
    async fn delete(&self, id: i64) -> ProductResult<bool>;

    async fn find_page(&self, page: &PageRequest) -> ProductResult<Vec<Product>>;

    /// Page of products with `from <= price <= to`.
    async fn find_page_by_price_between(
        &self,
        from: Decimal,
        to: Decimal,
        page: &PageRequest,
    ) -> ProductResult<Vec<Product>>;
}

/// Checked sort field for `page`.
pub fn sort_field(page: &PageRequest) -> ProductResult<ProductSortField> {
    page.validate()?;
    ProductSortField::from_str(&page.sort_by)
        .map_err(|_| ProductError::UnknownSortField(page.sort_by.clone()))
}

/// In-memory implementation for development and tests
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<BTreeMap<i64, Product>>>,
    last_id: Arc<AtomicI64>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn page_of<'a>(
        products: impl Iterator<Item = &'a Product>,
        page: &PageRequest,
    ) -> ProductResult<Vec<Product>> {
        let field = sort_field(page)?;

        let mut rows: Vec<Product> = products.cloned().collect();
        // BTreeMap iteration is already in id order, and the sort is stable
        match field {
            ProductSortField::Id => {}
            ProductSortField::Name => rows.sort_by(|a, b| a.name.cmp(&b.name)),
            ProductSortField::Price => rows.sort_by(|a, b| a.price.cmp(&b.price)),
        }

        Ok(rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect())
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        // Ids are never reused, like a database sequence
        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let product = product.with_id(id);
        products.insert(id, product.clone());

        tracing::info!(product_id = id, "Created product");
        Ok(product)
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(&id).cloned())
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let mut products = self.products.write().await;

        let existing = products
            .get_mut(&product.id)
            .ok_or(ProductError::NotFound(product.id))?;
        *existing = product.clone();

        tracing::info!(product_id = product.id, "Updated product");
        Ok(product)
    }

    async fn delete(&self, id: i64) -> ProductResult<bool> {
        let mut products = self.products.write().await;
        let deleted = products.remove(&id).is_some();

        if deleted {
            tracing::info!(product_id = id, "Deleted product");
        }
        Ok(deleted)
    }

    async fn find_page(&self, page: &PageRequest) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Self::page_of(products.values(), page)
    }

    async fn find_page_by_price_between(
        &self,
        from: Decimal,
        to: Decimal,
        page: &PageRequest,
    ) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;
        Self::page_of(
            products.values().filter(|p| from <= p.price && p.price <= to),
            page,
        )
    }
}
