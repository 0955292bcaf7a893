use crate::{
    domain::requests::shipping_address::{
        CreateShippingAddressRecordRequest, UpdateShippingAddressRecordRequest,
    },
    model::shipping_address::ShippingAddress as ShippingAddressModel,
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynShippingAddressRepository = Arc<dyn ShippingAddressRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ShippingAddressRepositoryTrait {
    async fn create_shipping_address(
        &self,
        req: &CreateShippingAddressRecordRequest,
    ) -> Result<ShippingAddressModel, RepositoryError>;

    async fn update_shipping_address(
        &self,
        req: &UpdateShippingAddressRecordRequest,
    ) -> Result<ShippingAddressModel, RepositoryError>;

    async fn find_by_order(
        &self,
        order_id: i32,
    ) -> Result<Option<ShippingAddressModel>, RepositoryError>;

    async fn delete_by_order(&self, order_id: i32) -> Result<bool, RepositoryError>;
}
