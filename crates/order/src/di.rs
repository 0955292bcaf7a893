use crate::{
    repository::{
        LifecycleIntentRepository, MerchantRepository, OrderCommandRepository,
        OrderItemCommandRepository, OrderItemQueryRepository, OrderQueryRepository,
        ProductCatalogRepository, ShippingAddressRepository, UserRepository,
    },
    service::order::{
        OrderCommandConfig, OrderCommandService, OrderCommandServiceDeps, OrderQueryService,
    },
};
use prometheus_client::registry::Registry;
use shared::{
    config::ConnectionPool,
    utils::{DynMetricsSink, Metrics},
};
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct DependenciesInject {
    pub order_query: OrderQueryService,
    pub order_command: OrderCommandService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("order_query", &"OrderQueryService")
            .field("order_command", &"OrderCommandService")
            .finish()
    }
}

impl DependenciesInject {
    /// Wires the Postgres stores into the services and registers each service's
    /// request metrics in `registry` exactly once.
    pub fn new(pool: ConnectionPool, config: OrderCommandConfig, registry: &mut Registry) -> Self {
        let order_query_repo = Arc::new(OrderQueryRepository::new(pool.clone()));
        let order_command_repo = Arc::new(OrderCommandRepository::new(pool.clone()));
        let order_item_query_repo = Arc::new(OrderItemQueryRepository::new(pool.clone()));
        let order_item_command_repo = Arc::new(OrderItemCommandRepository::new(pool.clone()));

        let query_metrics = Metrics::new();
        query_metrics.register(registry, "order_query_service", "OrderQueryService");

        let command_metrics = Metrics::new();
        command_metrics.register(registry, "order_command_service", "OrderCommandService");

        let order_query = OrderQueryService::new(
            order_query_repo.clone(),
            Arc::new(query_metrics) as DynMetricsSink,
        );

        let order_command = OrderCommandService::new(OrderCommandServiceDeps {
            merchants: Arc::new(MerchantRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            products: Arc::new(ProductCatalogRepository::new(pool.clone())),
            command: order_command_repo,
            query: order_query_repo,
            order_item_command: order_item_command_repo,
            order_item_query: order_item_query_repo,
            shipping: Arc::new(ShippingAddressRepository::new(pool.clone())),
            intents: Arc::new(LifecycleIntentRepository::new(pool)),
            metrics: Arc::new(command_metrics),
            config,
        });

        Self {
            order_query,
            order_command,
        }
    }
}
