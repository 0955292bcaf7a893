use crate::{
    abstract_trait::order::repository::OrderCommandRepositoryTrait,
    domain::requests::order::{CreateOrderRecordRequest, UpdateOrderRecordRequest},
    model::order::Order as OrderModel,
};
use shared::{config::ConnectionPool, errors::RepositoryError};

use async_trait::async_trait;
use tracing::{error, info};

const ORDER_COLUMNS: &str =
    "order_id, merchant_id, user_id, total_price, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct OrderCommandRepository {
    db: ConnectionPool,
}

impl OrderCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for OrderCommandRepository {
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<OrderModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            INSERT INTO orders (merchant_id, user_id, total_price, created_at, updated_at)
            VALUES ($1, $2, $3, current_timestamp, current_timestamp)
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<_, OrderModel>(&sql)
            .bind(req.merchant_id)
            .bind(req.user_id)
            .bind(req.total_price)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to create order for merchant {} user {}: {:?}",
                    req.merchant_id, req.user_id, err
                );
                RepositoryError::from(err)
            })?;

        info!(
            "✅ Created order ID {} for user {}",
            result.order_id, result.user_id
        );
        Ok(result)
    }

    async fn update_order(
        &self,
        req: &UpdateOrderRecordRequest,
    ) -> Result<OrderModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            UPDATE orders
            SET user_id     = $2,
                total_price = $3,
                updated_at  = current_timestamp
            WHERE order_id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let result = sqlx::query_as::<_, OrderModel>(&sql)
            .bind(req.order_id)
            .bind(req.user_id)
            .bind(req.total_price)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!("❌ Failed to update order ID {}: {:?}", req.order_id, err);
                RepositoryError::from(err)
            })?;

        info!(
            "🔄 Updated order ID {} (total {})",
            result.order_id, result.total_price
        );
        Ok(result)
    }

    async fn trash_order(&self, id: i32) -> Result<OrderModel, RepositoryError> {
        info!("🗑️ Trashing order: {}", id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            UPDATE orders
            SET deleted_at = COALESCE(deleted_at, current_timestamp),
                updated_at = current_timestamp
            WHERE order_id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let order = sqlx::query_as::<_, OrderModel>(&sql)
            .bind(id)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to trash order {}: {:?}", id, e);
                RepositoryError::from(e)
            })?;

        Ok(order)
    }

    async fn restore_order(&self, id: i32) -> Result<OrderModel, RepositoryError> {
        info!("🔄 Restoring order: {}", id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            UPDATE orders
            SET deleted_at = NULL,
                updated_at = current_timestamp
            WHERE order_id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        );

        let order = sqlx::query_as::<_, OrderModel>(&sql)
            .bind(id)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to restore order {}: {:?}", id, e);
                RepositoryError::from(e)
            })?;

        Ok(order)
    }

    async fn delete_order(&self, id: i32) -> Result<bool, RepositoryError> {
        info!("❌ Hard deleting order: {}", id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query("DELETE FROM orders WHERE order_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to permanently delete order {}: {:?}", id, e);
                RepositoryError::from(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn restore_all_orders(&self) -> Result<u64, RepositoryError> {
        info!("🔄 Restoring all trashed orders");

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query(
            r#"
            UPDATE orders
            SET deleted_at = NULL,
                updated_at = current_timestamp
            WHERE deleted_at IS NOT NULL
            "#,
        )
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to restore all orders: {:?}", e);
            RepositoryError::from(e)
        })?;

        info!("✅ Restored {} orders", result.rows_affected());
        Ok(result.rows_affected())
    }

    async fn delete_all_orders(&self) -> Result<Vec<i32>, RepositoryError> {
        info!("🧨 Permanently deleting all trashed orders");

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let ids: Vec<i32> = sqlx::query_scalar(
            r#"
            DELETE FROM orders
            WHERE deleted_at IS NOT NULL
            RETURNING order_id
            "#,
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to delete all trashed orders: {:?}", e);
            RepositoryError::from(e)
        })?;

        info!("✅ Permanently deleted {} orders", ids.len());
        Ok(ids)
    }
}
