use crate::{abstract_trait::product::ProductCatalogTrait, model::product::Product as ProductModel};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct ProductCatalogRepository {
    db: ConnectionPool,
}

impl ProductCatalogRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCatalogTrait for ProductCatalogRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, ProductModel>(
            r#"
            SELECT product_id, name, price, count_in_stock, created_at, updated_at
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch product {}: {:?}", id, e);
            RepositoryError::from(e)
        })
    }

    async fn decrease_stock(
        &self,
        product_id: i32,
        qty: i32,
    ) -> Result<Option<ProductModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(
            r#"
            UPDATE products
            SET count_in_stock = count_in_stock - $2,
                updated_at     = current_timestamp
            WHERE product_id = $1 AND count_in_stock >= $2
            RETURNING product_id, name, price, count_in_stock, created_at, updated_at
            "#,
        )
        .bind(product_id)
        .bind(qty)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to decrease stock product {}: {:?}",
                product_id, err
            );
            RepositoryError::from(err)
        })?;

        match &result {
            Some(product) => info!(
                "✅ Decreased stock product ID {} (new stock: {})",
                product.product_id, product.count_in_stock
            ),
            None => warn!(
                "⚠️ Stock of product {} not decreased: fewer than {} units available",
                product_id, qty
            ),
        }

        Ok(result)
    }

    async fn increase_stock(
        &self,
        product_id: i32,
        qty: i32,
    ) -> Result<ProductModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query_as::<_, ProductModel>(
            r#"
            UPDATE products
            SET count_in_stock = count_in_stock + $2,
                updated_at     = current_timestamp
            WHERE product_id = $1
            RETURNING product_id, name, price, count_in_stock, created_at, updated_at
            "#,
        )
        .bind(product_id)
        .bind(qty)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            error!(
                "❌ Failed to increase stock product {}: {:?}",
                product_id, err
            );
            RepositoryError::from(err)
        })?;

        info!(
            "✅ Increased stock product ID {} (new stock: {})",
            result.product_id, result.count_in_stock
        );
        Ok(result)
    }
}
