use crate::{
    abstract_trait::shipping_address::ShippingAddressRepositoryTrait,
    domain::requests::shipping_address::{
        CreateShippingAddressRecordRequest, UpdateShippingAddressRecordRequest,
    },
    model::shipping_address::ShippingAddress as ShippingAddressModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

const SHIPPING_COLUMNS: &str = "shipping_address_id, order_id, address, province, city, country, \
     courier, shipping_method, shipping_cost, created_at, updated_at, deleted_at";

#[derive(Clone)]
pub struct ShippingAddressRepository {
    db: ConnectionPool,
}

impl ShippingAddressRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ShippingAddressRepositoryTrait for ShippingAddressRepository {
    async fn create_shipping_address(
        &self,
        req: &CreateShippingAddressRecordRequest,
    ) -> Result<ShippingAddressModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            INSERT INTO shipping_addresses (
                order_id, address, province, city, country,
                courier, shipping_method, shipping_cost,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, current_timestamp, current_timestamp)
            RETURNING {SHIPPING_COLUMNS}
            "#
        );

        let details = &req.details;
        let shipping = sqlx::query_as::<_, ShippingAddressModel>(&sql)
            .bind(req.order_id)
            .bind(&details.address)
            .bind(&details.province)
            .bind(&details.city)
            .bind(&details.country)
            .bind(&details.courier)
            .bind(&details.shipping_method)
            .bind(details.shipping_cost)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to create shipping address for order {}: {:?}",
                    req.order_id, err
                );
                RepositoryError::from(err)
            })?;

        info!(
            "🚚 Created shipping address ID {} for order {}",
            shipping.shipping_address_id, shipping.order_id
        );
        Ok(shipping)
    }

    async fn update_shipping_address(
        &self,
        req: &UpdateShippingAddressRecordRequest,
    ) -> Result<ShippingAddressModel, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!(
            r#"
            UPDATE shipping_addresses
            SET address         = $3,
                province        = $4,
                city            = $5,
                country         = $6,
                courier         = $7,
                shipping_method = $8,
                shipping_cost   = $9,
                updated_at      = current_timestamp
            WHERE shipping_address_id = $1 AND order_id = $2
            RETURNING {SHIPPING_COLUMNS}
            "#
        );

        let details = &req.details;
        let shipping = sqlx::query_as::<_, ShippingAddressModel>(&sql)
            .bind(req.shipping_address_id)
            .bind(req.order_id)
            .bind(&details.address)
            .bind(&details.province)
            .bind(&details.city)
            .bind(&details.country)
            .bind(&details.courier)
            .bind(&details.shipping_method)
            .bind(details.shipping_cost)
            .fetch_one(&mut *conn)
            .await
            .map_err(|err| {
                error!(
                    "❌ Failed to update shipping address {}: {:?}",
                    req.shipping_address_id, err
                );
                RepositoryError::from(err)
            })?;

        info!(
            "🔄 Updated shipping address ID {}",
            shipping.shipping_address_id
        );
        Ok(shipping)
    }

    async fn find_by_order(
        &self,
        order_id: i32,
    ) -> Result<Option<ShippingAddressModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let sql = format!("SELECT {SHIPPING_COLUMNS} FROM shipping_addresses WHERE order_id = $1");

        sqlx::query_as::<_, ShippingAddressModel>(&sql)
            .bind(order_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!(
                    "❌ Failed to fetch shipping address for order {}: {:?}",
                    order_id, e
                );
                RepositoryError::from(e)
            })
    }

    async fn delete_by_order(&self, order_id: i32) -> Result<bool, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query("DELETE FROM shipping_addresses WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                error!(
                    "❌ Failed to delete shipping address for order {}: {:?}",
                    order_id, e
                );
                RepositoryError::from(e)
            })?;

        info!("🗑️ Deleted shipping address of order {}", order_id);
        Ok(result.rows_affected() > 0)
    }
}
