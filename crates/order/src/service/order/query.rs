use crate::{
    abstract_trait::order::{repository::DynOrderQueryRepository, service::OrderQueryServiceTrait},
    domain::{
        requests::order::FindAllOrder,
        response::{
            api::{ApiResponse, ApiResponsePagination},
            order::{OrderResponse, OrderResponseDeleteAt},
            pagination::Pagination,
        },
    },
    model::order::Order as OrderModel,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use shared::{
    errors::{Operation, ServiceError},
    utils::{DynMetricsSink, Instrumentation, Method, RequestContext},
};
use tracing::info;

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    instrumentation: Instrumentation,
}

impl OrderQueryService {
    pub fn new(query: DynOrderQueryRepository, metrics: DynMetricsSink) -> Self {
        Self {
            query,
            instrumentation: Instrumentation::new("order-query-service", metrics),
        }
    }

    fn paginate(
        orders: Vec<OrderModel>,
        total: i64,
        req: &FindAllOrder,
        message: &str,
    ) -> ApiResponsePagination<Vec<OrderResponseDeleteAt>> {
        ApiResponsePagination {
            status: "success".into(),
            message: message.into(),
            data: orders.into_iter().map(OrderResponseDeleteAt::from).collect(),
            pagination: Pagination::new(req.page, req.page_size, total),
        }
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_active(
        &self,
        ctx: &RequestContext,
        req: &FindAllOrder,
    ) -> Result<ApiResponsePagination<Vec<OrderResponseDeleteAt>>, ServiceError> {
        let req = req.normalized();
        info!(
            "🟢 Fetching active orders | Page: {}, Size: {}, Search: {:?}",
            req.page, req.page_size, req.search
        );

        let tracing_ctx = self.instrumentation.start_tracing(
            "find_active_orders",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "find_active"),
                KeyValue::new("page", req.page.to_string()),
                KeyValue::new("page_size", req.page_size.to_string()),
            ],
        );

        let result = ctx
            .run(self.query.find_active(&req))
            .await
            .map_err(ServiceError::from)
            .and_then(|r| r.map_err(ServiceError::operation(Operation::FindOrder)));

        match result {
            Ok((orders, total)) => {
                self.instrumentation.complete_tracing_success(
                    &tracing_ctx,
                    Method::Get,
                    "Active orders retrieved successfully",
                );
                Ok(Self::paginate(
                    orders,
                    total,
                    &req,
                    "Active orders retrieved successfully",
                ))
            }
            Err(err) => {
                self.instrumentation.complete_tracing_error(
                    &tracing_ctx,
                    Method::Get,
                    &err.to_string(),
                );
                Err(err)
            }
        }
    }

    async fn find_trashed(
        &self,
        ctx: &RequestContext,
        req: &FindAllOrder,
    ) -> Result<ApiResponsePagination<Vec<OrderResponseDeleteAt>>, ServiceError> {
        let req = req.normalized();
        info!(
            "🗑️ Fetching trashed orders | Page: {}, Size: {}, Search: {:?}",
            req.page, req.page_size, req.search
        );

        let tracing_ctx = self.instrumentation.start_tracing(
            "find_trashed_orders",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "find_trashed"),
                KeyValue::new("page", req.page.to_string()),
                KeyValue::new("page_size", req.page_size.to_string()),
            ],
        );

        let result = ctx
            .run(self.query.find_trashed(&req))
            .await
            .map_err(ServiceError::from)
            .and_then(|r| r.map_err(ServiceError::operation(Operation::FindOrder)));

        match result {
            Ok((orders, total)) => {
                self.instrumentation.complete_tracing_success(
                    &tracing_ctx,
                    Method::Get,
                    "Trashed orders retrieved successfully",
                );
                Ok(Self::paginate(
                    orders,
                    total,
                    &req,
                    "Trashed orders retrieved successfully",
                ))
            }
            Err(err) => {
                self.instrumentation.complete_tracing_error(
                    &tracing_ctx,
                    Method::Get,
                    &err.to_string(),
                );
                Err(err)
            }
        }
    }

    async fn find_by_id(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🆔 Fetching order by ID: {id}");

        let tracing_ctx = self.instrumentation.start_tracing(
            "find_order_by_id",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "find_by_id"),
                KeyValue::new("order.id", id.to_string()),
            ],
        );

        let result = ctx
            .run(self.query.find_by_id(id))
            .await
            .map_err(ServiceError::from)
            .and_then(|r| r.map_err(ServiceError::operation(Operation::FindOrder)))
            .and_then(|order| order.ok_or(ServiceError::OrderNotFound(id)));

        match result {
            Ok(order) => {
                self.instrumentation.complete_tracing_success(
                    &tracing_ctx,
                    Method::Get,
                    "Order retrieved successfully",
                );
                Ok(ApiResponse::success(
                    "Order retrieved successfully",
                    OrderResponse::from(order),
                ))
            }
            Err(err) => {
                self.instrumentation.complete_tracing_error(
                    &tracing_ctx,
                    Method::Get,
                    &err.to_string(),
                );
                Err(err)
            }
        }
    }
}
