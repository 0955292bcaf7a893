use crate::{
    abstract_trait::order_item::repository::OrderItemCommandRepositoryTrait,
    domain::requests::order_item::{CreateOrderItemRecordRequest, UpdateOrderItemRecordRequest},
    model::order_item::OrderItem as OrderItemModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

const ORDER_ITEM_COLUMNS: &str =
    "order_item_id, order_id, product_id, quantity, price, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct OrderItemCommandRepository {
    db: ConnectionPool,
}

impl OrderItemCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderItemCommandRepositoryTrait for OrderItemCommandRepository {
    async fn create_order_item(
        &self,
        req: &CreateOrderItemRecordRequest,
    ) -> Result<OrderItemModel, RepositoryError> {
        info!(
            "📝 Creating order item for order {} product {} (qty {})",
            req.order_id, req.product_id, req.quantity
        );

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            INSERT INTO order_items (order_id, product_id, quantity, price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, current_timestamp, current_timestamp)
            RETURNING {ORDER_ITEM_COLUMNS}
            "#
        );

        let item = sqlx::query_as::<_, OrderItemModel>(&sql)
            .bind(req.order_id)
            .bind(req.product_id)
            .bind(req.quantity)
            .bind(req.price)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to create order item for order {}: {:?}",
                    req.order_id, err
                );
                RepositoryError::from(err)
            })?;

        info!("✅ Created order item ID {}", item.order_item_id);
        Ok(item)
    }

    async fn update_order_item(
        &self,
        req: &UpdateOrderItemRecordRequest,
    ) -> Result<OrderItemModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            UPDATE order_items
            SET product_id = $3,
                quantity   = $4,
                price      = $5,
                updated_at = current_timestamp
            WHERE order_item_id = $1 AND order_id = $2
            RETURNING {ORDER_ITEM_COLUMNS}
            "#
        );

        let item = sqlx::query_as::<_, OrderItemModel>(&sql)
            .bind(req.order_item_id)
            .bind(req.order_id)
            .bind(req.product_id)
            .bind(req.quantity)
            .bind(req.price)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to update order item {}: {:?}",
                    req.order_item_id, err
                );
                RepositoryError::from(err)
            })?;

        info!("🔄 Updated order item ID {}", item.order_item_id);
        Ok(item)
    }

    async fn trashed_order_item(
        &self,
        order_item_id: i32,
    ) -> Result<OrderItemModel, RepositoryError> {
        info!("🗑️ Trashing order item: {}", order_item_id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            UPDATE order_items
            SET deleted_at = COALESCE(deleted_at, current_timestamp),
                updated_at = current_timestamp
            WHERE order_item_id = $1
            RETURNING {ORDER_ITEM_COLUMNS}
            "#
        );

        sqlx::query_as::<_, OrderItemModel>(&sql)
            .bind(order_item_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to trash order item {}: {:?}", order_item_id, e);
                RepositoryError::from(e)
            })
    }

    async fn restore_order_item(
        &self,
        order_item_id: i32,
    ) -> Result<OrderItemModel, RepositoryError> {
        info!("🔄 Restoring order item: {}", order_item_id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            UPDATE order_items
            SET deleted_at = NULL,
                updated_at = current_timestamp
            WHERE order_item_id = $1
            RETURNING {ORDER_ITEM_COLUMNS}
            "#
        );

        sqlx::query_as::<_, OrderItemModel>(&sql)
            .bind(order_item_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to restore order item {}: {:?}", order_item_id, e);
                RepositoryError::from(e)
            })
    }

    async fn delete_order_item_permanent(
        &self,
        order_item_id: i32,
    ) -> Result<bool, RepositoryError> {
        info!("❌ Hard deleting order item: {}", order_item_id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query("DELETE FROM order_items WHERE order_item_id = $1")
            .bind(order_item_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                error!(
                    "❌ Failed to permanently delete order item {}: {:?}",
                    order_item_id, e
                );
                RepositoryError::from(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn restore_all_order_item(&self) -> Result<u64, RepositoryError> {
        info!("🔄 Restoring all trashed order items");

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query(
            r#"
            UPDATE order_items
            SET deleted_at = NULL,
                updated_at = current_timestamp
            WHERE deleted_at IS NOT NULL
            "#,
        )
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to restore all order items: {:?}", e);
            RepositoryError::from(e)
        })?;

        info!("✅ Restored {} order items", result.rows_affected());
        Ok(result.rows_affected())
    }

    async fn delete_all_order_item_permanent(
        &self,
    ) -> Result<Vec<OrderItemModel>, RepositoryError> {
        info!("🧨 Permanently deleting all trashed order items");

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            DELETE FROM order_items
            WHERE deleted_at IS NOT NULL
            RETURNING {ORDER_ITEM_COLUMNS}
            "#
        );

        let items = sqlx::query_as::<_, OrderItemModel>(&sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete all trashed order items: {:?}", e);
                RepositoryError::from(e)
            })?;

        info!("✅ Permanently deleted {} order items", items.len());
        Ok(items)
    }
}
