//! Product Service - thin facade over a [`ProductRepository`]

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{ProductError, ProductResult};
use crate::models::Product;
use crate::pagination::PageRequest;
use crate::repository::ProductRepository;

/// Product operations used by the HTTP handlers.
///
/// Every call is independent; state lives in the repository.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Insert a product and return it with its assigned id
    #[instrument(skip(self, product), fields(product_name = %product.name))]
    pub async fn save(&self, product: Product) -> ProductResult<Product> {
        self.repository.create(product).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> ProductResult<Product> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(ProductError::NotFound(id))
    }

    /// Overwrite name and price of the product with `product.id`
    #[instrument(skip(self, product), fields(product_id = product.id))]
    pub async fn update(&self, product: Product) -> ProductResult<Product> {
        self.repository.update(product).await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, id: i64) -> ProductResult<()> {
        if !self.repository.delete(id).await? {
            return Err(ProductError::NotFound(id));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self, page: &PageRequest) -> ProductResult<Vec<Product>> {
        self.repository.find_page(page).await
    }

    /// Page of products priced within `[from, to]`
    #[instrument(skip(self))]
    pub async fn find_all_by_price_between(
        &self,
        from: Decimal,
        to: Decimal,
        page: &PageRequest,
    ) -> ProductResult<Vec<Product>> {
        self.repository
            .find_page_by_price_between(from, to, page)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockProductRepository;
    use mockall::predicate::{always, eq};

    fn price(units: i64) -> Decimal {
        Decimal::new(units, 0)
    }

    #[tokio::test]
    async fn test_save_returns_assigned_id() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_create()
            .withf(|p| p.id == 0 && p.name == "Kettle")
            .returning(|p| Ok(p.with_id(7)));

        let service = ProductService::new(mock_repo);
        let saved = service.save(Product::new("Kettle", price(40))).await.unwrap();

        assert_eq!(saved.id, 7);
        assert_eq!(saved.price, price(40));
    }

    #[tokio::test]
    async fn test_get_missing_product_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(42))
            .returning(|_| Ok(None));

        let service = ProductService::new(mock_repo);
        let result = service.get(42).await;

        assert!(matches!(result, Err(ProductError::NotFound(42))));
    }

    #[tokio::test]
    async fn test_get_existing_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_get_by_id()
            .with(eq(3))
            .returning(|id| Ok(Some(Product::new("Teapot", price(25)).with_id(id))));

        let service = ProductService::new(mock_repo);
        let product = service.get(3).await.unwrap();

        assert_eq!(product.id, 3);
        assert_eq!(product.name, "Teapot");
    }

    #[tokio::test]
    async fn test_update_propagates_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_update()
            .returning(|p| Err(ProductError::NotFound(p.id)));

        let service = ProductService::new(mock_repo);
        let result = service.update(Product::new("Ghost", price(1)).with_id(5)).await;

        assert!(matches!(result, Err(ProductError::NotFound(5))));
    }

    #[tokio::test]
    async fn test_remove_missing_product_is_not_found() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_delete().with(eq(9)).returning(|_| Ok(false));

        let service = ProductService::new(mock_repo);

        assert!(matches!(
            service.remove(9).await,
            Err(ProductError::NotFound(9))
        ));
    }

    #[tokio::test]
    async fn test_remove_existing_product() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo.expect_delete().with(eq(9)).returning(|_| Ok(true));

        let service = ProductService::new(mock_repo);

        assert!(service.remove(9).await.is_ok());
    }

    #[tokio::test]
    async fn test_find_all_by_price_between_passes_bounds_through() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_find_page_by_price_between()
            .with(eq(price(10)), eq(price(20)), always())
            .times(1)
            .returning(|_, _, _| Ok(vec![Product::new("Cup", price(12)).with_id(1)]));

        let service = ProductService::new(mock_repo);
        let found = service
            .find_all_by_price_between(price(10), price(20), &PageRequest::default())
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Cup");
    }

    #[tokio::test]
    async fn test_find_all_surfaces_invalid_page() {
        let mut mock_repo = MockProductRepository::new();
        mock_repo
            .expect_find_page()
            .returning(|page| crate::repository::sort_field(page).map(|_| Vec::new()));

        let service = ProductService::new(mock_repo);
        let result = service
            .find_all(&PageRequest::normalize(Some(0), None, None))
            .await;

        assert!(matches!(result, Err(ProductError::InvalidPage(_))));
    }
}
