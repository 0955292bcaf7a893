use crate::domain::{
    requests::order::FindAllOrder,
    response::{
        api::{ApiResponse, ApiResponsePagination},
        order::{OrderResponse, OrderResponseDeleteAt},
    },
};
use async_trait::async_trait;
use shared::{errors::ServiceError, utils::RequestContext};
use std::sync::Arc;

pub type DynOrderQueryService = Arc<dyn OrderQueryServiceTrait + Send + Sync>;

#[async_trait]
pub trait OrderQueryServiceTrait {
    async fn find_active(
        &self,
        ctx: &RequestContext,
        req: &FindAllOrder,
    ) -> Result<ApiResponsePagination<Vec<OrderResponseDeleteAt>>, ServiceError>;
    async fn find_trashed(
        &self,
        ctx: &RequestContext,
        req: &FindAllOrder,
    ) -> Result<ApiResponsePagination<Vec<OrderResponseDeleteAt>>, ServiceError>;
    async fn find_by_id(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError>;
}
