use crate::{
    domain::requests::order::{CreateOrderRecordRequest, UpdateOrderRecordRequest},
    model::order::Order as OrderModel,
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynOrderCommandRepository = Arc<dyn OrderCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandRepositoryTrait {
    async fn create_order(
        &self,
        req: &CreateOrderRecordRequest,
    ) -> Result<OrderModel, RepositoryError>;
    async fn update_order(
        &self,
        req: &UpdateOrderRecordRequest,
    ) -> Result<OrderModel, RepositoryError>;
    async fn trash_order(&self, id: i32) -> Result<OrderModel, RepositoryError>;
    async fn restore_order(&self, id: i32) -> Result<OrderModel, RepositoryError>;
    /// Removes the header regardless of its trashed marker; returns whether a row went away.
    async fn delete_order(&self, id: i32) -> Result<bool, RepositoryError>;
    async fn restore_all_orders(&self) -> Result<u64, RepositoryError>;
    /// Deletes every trashed order and returns the ids that were removed.
    async fn delete_all_orders(&self) -> Result<Vec<i32>, RepositoryError>;
}
