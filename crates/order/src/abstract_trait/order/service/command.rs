use crate::domain::{
    requests::order::{CreateOrderRequest, UpdateOrderRequest},
    response::{
        api::ApiResponse,
        order::{OrderResponse, OrderResponseDeleteAt},
    },
};
use async_trait::async_trait;
use shared::{errors::ServiceError, utils::RequestContext};
use std::sync::Arc;

pub type DynOrderCommandService = Arc<dyn OrderCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderCommandServiceTrait {
    async fn create_order(
        &self,
        ctx: &RequestContext,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn update_order(
        &self,
        ctx: &RequestContext,
        req: &UpdateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
    async fn trash_order(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ApiResponse<OrderResponseDeleteAt>, ServiceError>;
    async fn restore_order(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ApiResponse<OrderResponseDeleteAt>, ServiceError>;
    async fn delete_order(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ApiResponse<()>, ServiceError>;
    async fn restore_all_order(&self, ctx: &RequestContext)
    -> Result<ApiResponse<()>, ServiceError>;
    async fn delete_all_order(&self, ctx: &RequestContext)
    -> Result<ApiResponse<()>, ServiceError>;
    /// Rolls every unfinished lifecycle cascade forward; returns how many were finished.
    async fn recover_pending_cascades(
        &self,
        ctx: &RequestContext,
    ) -> Result<ApiResponse<usize>, ServiceError>;
}
