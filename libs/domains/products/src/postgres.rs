use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
    QuerySelect, Select,
};

use crate::{
    entity,
    error::{ProductError, ProductResult},
    models::{Product, ProductSortField},
    pagination::PageRequest,
    repository::{ProductRepository, sort_field},
};

/// PostgreSQL implementation of [`ProductRepository`] on SeaORM.
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn column(field: ProductSortField) -> entity::Column {
        match field {
            ProductSortField::Id => entity::Column::Id,
            ProductSortField::Name => entity::Column::Name,
            ProductSortField::Price => entity::Column::Price,
        }
    }

    async fn fetch_page(
        &self,
        query: Select<entity::Entity>,
        page: &PageRequest,
    ) -> ProductResult<Vec<Product>> {
        let field = sort_field(page)?;

        let mut query = query.order_by(Self::column(field), Order::Asc);
        if field != ProductSortField::Id {
            // Stable pages when sort values repeat
            query = query.order_by_asc(entity::Column::Id);
        }

        tracing::debug!(
            sort_by = %field,
            direction = %page.direction,
            offset = page.offset(),
            limit = page.limit(),
            "Fetching product page"
        );

        let models = query
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Product::from).collect())
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: Product) -> ProductResult<Product> {
        let active_model: entity::ActiveModel = product.into();
        let model = active_model.insert(&self.db).await?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: i64) -> ProductResult<Option<Product>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Product::from))
    }

    async fn update(&self, product: Product) -> ProductResult<Product> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Name, Expr::value(product.name.clone()))
            .col_expr(entity::Column::Price, Expr::value(product.price))
            .filter(entity::Column::Id.eq(product.id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ProductError::NotFound(product.id));
        }

        tracing::info!(product_id = product.id, "Updated product");
        Ok(product)
    }

    async fn delete(&self, id: i64) -> ProductResult<bool> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;
        let deleted = result.rows_affected > 0;

        if deleted {
            tracing::info!(product_id = id, "Deleted product");
        }
        Ok(deleted)
    }

    async fn find_page(&self, page: &PageRequest) -> ProductResult<Vec<Product>> {
        self.fetch_page(entity::Entity::find(), page).await
    }

    async fn find_page_by_price_between(
        &self,
        from: Decimal,
        to: Decimal,
        page: &PageRequest,
    ) -> ProductResult<Vec<Product>> {
        let query = entity::Entity::find().filter(entity::Column::Price.between(from, to));
        self.fetch_page(query, page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn row(id: i64, name: &str, cents: i64) -> entity::Model {
        entity::Model {
            id,
            name: name.to_string(),
            price: Decimal::new(cents, 2),
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn test_create_returns_assigned_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(17, "Lamp", 3500)]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let created = repo.create(Product::new("Lamp", Decimal::new(3500, 2))).await.unwrap();
        assert_eq!(created.id, 17);
        assert_eq!(created.name, "Lamp");
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(0)])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let result = repo.update(Product::new("Ghost", Decimal::ONE).with_id(5)).await;
        assert!(matches!(result, Err(ProductError::NotFound(5))));
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec(1), exec(0)])
            .into_connection();
        let repo = PgProductRepository::new(db);

        assert!(repo.delete(3).await.unwrap());
        assert!(!repo.delete(3).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_page_maps_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(2, "Mug", 800), row(1, "Cup", 900)]])
            .into_connection();
        let repo = PgProductRepository::new(db);

        let page = repo
            .find_page(&PageRequest::normalize(None, None, Some("price".into())))
            .await
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].name, "Mug");
    }

    #[tokio::test]
    async fn test_price_range_query_is_inclusive_ordered_and_paged() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgProductRepository::new(db.clone());

        repo.find_page_by_price_between(
            Decimal::TEN,
            Decimal::new(20, 0),
            &PageRequest::normalize(Some(3), Some(2), Some("price".into())),
        )
        .await
        .unwrap();

        let log = db.into_transaction_log();
        assert_eq!(log.len(), 1);
        let statement = &log[0].statements()[0];
        assert!(
            statement.sql.ends_with(concat!(
                r#"WHERE "products"."price" BETWEEN $1 AND $2 "#,
                r#"ORDER BY "products"."price" ASC, "products"."id" ASC "#,
                r#"LIMIT $3 OFFSET $4"#,
            )),
            "unexpected SQL: {}",
            statement.sql
        );
        let values = statement.values.as_ref().unwrap();
        assert_eq!(values.0.len(), 4);
    }

    #[tokio::test]
    async fn test_id_sort_has_no_tiebreak_column() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgProductRepository::new(db.clone());

        repo.find_page(&PageRequest::default()).await.unwrap();

        let log = db.into_transaction_log();
        let sql = &log[0].statements()[0].sql;
        assert!(
            sql.ends_with(r#"ORDER BY "products"."id" ASC LIMIT $1 OFFSET $2"#),
            "unexpected SQL: {sql}"
        );
    }

    #[tokio::test]
    async fn test_bad_page_request_never_reaches_the_database() {
        // No results queued: any query would fail with a different error
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgProductRepository::new(db);

        let unknown = repo
            .find_page(&PageRequest::normalize(None, None, Some("weight".into())))
            .await;
        assert!(matches!(unknown, Err(ProductError::UnknownSortField(_))));

        let negative = repo
            .find_page_by_price_between(
                Decimal::ZERO,
                Decimal::TEN,
                &PageRequest::normalize(Some(5), Some(-1), None),
            )
            .await;
        assert!(matches!(negative, Err(ProductError::InvalidPage(_))));
    }
}
