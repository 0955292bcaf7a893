use crate::{
    abstract_trait::{
        directory::{DynMerchantRepository, DynUserRepository},
        lifecycle_intent::DynLifecycleIntentRepository,
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::OrderCommandServiceTrait,
        },
        order_item::repository::{DynOrderItemCommandRepository, DynOrderItemQueryRepository},
        product::DynProductCatalog,
        shipping_address::DynShippingAddressRepository,
    },
    domain::{
        requests::{
            order::{
                CreateOrderItemRequest, CreateOrderRecordRequest, CreateOrderRequest,
                UpdateOrderItemRequest, UpdateOrderRecordRequest, UpdateOrderRequest,
            },
            order_item::{CreateOrderItemRecordRequest, UpdateOrderItemRecordRequest},
            shipping_address::{
                CreateShippingAddressRecordRequest, UpdateShippingAddressRecordRequest,
                UpdateShippingAddressRequest,
            },
            validate_request,
        },
        response::{
            api::ApiResponse,
            order::{OrderResponse, OrderResponseDeleteAt},
        },
        state::{LifecycleAction, OrderState},
    },
    model::{
        lifecycle_intent::LifecycleIntent, order::Order as OrderModel,
        order_item::OrderItem as OrderItemModel, product::Product as ProductModel,
    },
    service::order::{
        policy::{ItemDeltaPolicy, OrderCommandConfig},
        saga::{Compensation, Saga},
    },
};
use shared::{
    errors::{Operation, RepositoryError, ServiceError},
    utils::{DynMetricsSink, Instrumentation, Method, RequestContext, TracingContext},
};

use async_trait::async_trait;
use opentelemetry::KeyValue;
use std::future::Future;
use tokio::time::Instant;
use tracing::{error, info, warn};

/// Runs one collaborator read under the caller's deadline and cancel signal.
async fn step<T, F>(ctx: &RequestContext, operation: Operation, fut: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    ctx.run(fut)
        .await?
        .map_err(ServiceError::operation(operation))
}

/// Runs one collaborator write. The context is checked before the write starts; once
/// issued it runs to completion so its outcome is always known to the saga.
async fn commit<T, F>(ctx: &RequestContext, operation: Operation, fut: F) -> Result<T, ServiceError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    ctx.check()?;
    fut.await.map_err(ServiceError::operation(operation))
}

#[derive(Clone)]
pub struct OrderCommandService {
    merchants: DynMerchantRepository,
    users: DynUserRepository,
    products: DynProductCatalog,
    command: DynOrderCommandRepository,
    query: DynOrderQueryRepository,
    order_item_command: DynOrderItemCommandRepository,
    order_item_query: DynOrderItemQueryRepository,
    shipping: DynShippingAddressRepository,
    intents: DynLifecycleIntentRepository,
    instrumentation: Instrumentation,
    config: OrderCommandConfig,
}

pub struct OrderCommandServiceDeps {
    pub merchants: DynMerchantRepository,
    pub users: DynUserRepository,
    pub products: DynProductCatalog,
    pub command: DynOrderCommandRepository,
    pub query: DynOrderQueryRepository,
    pub order_item_command: DynOrderItemCommandRepository,
    pub order_item_query: DynOrderItemQueryRepository,
    pub shipping: DynShippingAddressRepository,
    pub intents: DynLifecycleIntentRepository,
    pub metrics: DynMetricsSink,
    pub config: OrderCommandConfig,
}

impl OrderCommandService {
    pub fn new(deps: OrderCommandServiceDeps) -> Self {
        let OrderCommandServiceDeps {
            merchants,
            users,
            products,
            command,
            query,
            order_item_command,
            order_item_query,
            shipping,
            intents,
            metrics,
            config,
        } = deps;

        Self {
            merchants,
            users,
            products,
            command,
            query,
            order_item_command,
            order_item_query,
            shipping,
            intents,
            instrumentation: Instrumentation::new("order-command-service", metrics),
            config,
        }
    }

    fn finish<T>(
        &self,
        tracing_ctx: &TracingContext,
        method: Method,
        result: &Result<T, ServiceError>,
        success_message: &str,
    ) {
        match result {
            Ok(_) => {
                self.instrumentation
                    .complete_tracing_success(tracing_ctx, method, success_message)
            }
            Err(err) => self.instrumentation.complete_tracing_error(
                tracing_ctx,
                method,
                &format!("{}: {err}", err.code()),
            ),
        }
    }

    async fn load_order(&self, ctx: &RequestContext, id: i32) -> Result<OrderModel, ServiceError> {
        step(ctx, Operation::FindOrder, self.query.find_by_id(id))
            .await?
            .ok_or(ServiceError::OrderNotFound(id))
    }

    async fn load_items(
        &self,
        ctx: &RequestContext,
        order_id: i32,
    ) -> Result<Vec<OrderItemModel>, ServiceError> {
        step(
            ctx,
            Operation::FindOrderItems,
            self.order_item_query.find_order_item_by_order(order_id),
        )
        .await
    }

    async fn ensure_merchant(&self, ctx: &RequestContext, id: i32) -> Result<(), ServiceError> {
        step(ctx, Operation::FindMerchant, self.merchants.find_by_id(id))
            .await?
            .map(|_| ())
            .ok_or(ServiceError::MerchantNotFound(id))
    }

    async fn ensure_user(&self, ctx: &RequestContext, id: i32) -> Result<(), ServiceError> {
        step(ctx, Operation::FindUser, self.users.find_by_id(id))
            .await?
            .map(|_| ())
            .ok_or(ServiceError::UserNotFound(id))
    }

    async fn find_product(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ProductModel, ServiceError> {
        step(ctx, Operation::FindProduct, self.products.find_by_id(id))
            .await?
            .ok_or(ServiceError::ProductNotFound(id))
    }

    /// Atomic conditional decrement; a refused decrement reports the stock seen afterwards.
    async fn take_stock(
        &self,
        ctx: &RequestContext,
        product_id: i32,
        quantity: i32,
    ) -> Result<ProductModel, ServiceError> {
        let taken = commit(
            ctx,
            Operation::DecreaseStock,
            self.products.decrease_stock(product_id, quantity),
        )
        .await?;

        match taken {
            Some(product) => Ok(product),
            None => {
                let available = step(ctx, Operation::FindProduct, self.products.find_by_id(product_id))
                    .await?
                    .ok_or(ServiceError::ProductNotFound(product_id))?
                    .count_in_stock;

                warn!(
                    "⚠️ Insufficient stock for product {}: requested={}, available={}",
                    product_id, quantity, available
                );
                Err(ServiceError::InsufficientStock {
                    product_id,
                    requested: quantity,
                    available,
                })
            }
        }
    }

    async fn return_stock(
        &self,
        ctx: &RequestContext,
        product_id: i32,
        quantity: i32,
    ) -> Result<ProductModel, ServiceError> {
        commit(
            ctx,
            Operation::IncreaseStock,
            self.products.increase_stock(product_id, quantity),
        )
        .await
    }

    /// Takes stock and persists a brand-new line, registering both undo steps.
    async fn add_line(
        &self,
        ctx: &RequestContext,
        order_id: i32,
        item: &CreateOrderItemRequest,
        saga: &mut Saga,
    ) -> Result<OrderItemModel, ServiceError> {
        let product = self.find_product(ctx, item.product_id).await?;

        self.take_stock(ctx, product.product_id, item.quantity)
            .await?;
        saga.push(Compensation::ReturnStock {
            product_id: product.product_id,
            quantity: item.quantity,
        });

        let created = commit(
            ctx,
            Operation::CreateOrderItem,
            self.order_item_command
                .create_order_item(&CreateOrderItemRecordRequest {
                    order_id,
                    product_id: product.product_id,
                    quantity: item.quantity,
                    price: product.price,
                }),
        )
        .await?;
        saga.push(Compensation::DeleteOrderItem(created.order_item_id));

        Ok(created)
    }

    async fn recompute_total(
        &self,
        ctx: &RequestContext,
        order_id: i32,
        user_id: i32,
    ) -> Result<OrderModel, ServiceError> {
        let total_price = step(
            ctx,
            Operation::CalculateTotal,
            self.order_item_query.calculate_total_price(order_id),
        )
        .await?;

        commit(
            ctx,
            Operation::UpdateOrder,
            self.command.update_order(&UpdateOrderRecordRequest {
                order_id,
                user_id,
                total_price,
            }),
        )
        .await
    }

    async fn build_order(
        &self,
        ctx: &RequestContext,
        req: &CreateOrderRequest,
        order: &OrderModel,
        saga: &mut Saga,
    ) -> Result<OrderModel, ServiceError> {
        for item in &req.items {
            self.add_line(ctx, order.order_id, item, saga).await?;
        }

        commit(
            ctx,
            Operation::CreateShippingAddress,
            self.shipping
                .create_shipping_address(&CreateShippingAddressRecordRequest {
                    order_id: order.order_id,
                    details: req.shipping.clone(),
                }),
        )
        .await?;
        saga.push(Compensation::DeleteShippingAddress(order.order_id));

        self.recompute_total(ctx, order.order_id, req.user_id).await
    }

    async fn create(
        &self,
        ctx: &RequestContext,
        req: &CreateOrderRequest,
    ) -> Result<OrderModel, ServiceError> {
        validate_request(req)?;
        self.ensure_merchant(ctx, req.merchant_id).await?;
        self.ensure_user(ctx, req.user_id).await?;

        let order = commit(
            ctx,
            Operation::CreateOrder,
            self.command.create_order(&CreateOrderRecordRequest {
                merchant_id: req.merchant_id,
                user_id: req.user_id,
                total_price: 0,
            }),
        )
        .await?;

        let mut saga = Saga::default();
        saga.push(Compensation::DeleteOrder(order.order_id));

        match self.build_order(ctx, req, &order, &mut saga).await {
            Ok(order) => Ok(order),
            Err(err) => {
                self.unwind(saga, &err).await;
                Err(err)
            }
        }
    }

    async fn revise_line(
        &self,
        ctx: &RequestContext,
        order_id: i32,
        current: &OrderItemModel,
        item: &UpdateOrderItemRequest,
        saga: &mut Saga,
    ) -> Result<OrderItemModel, ServiceError> {
        let product = self.find_product(ctx, item.product_id).await?;

        if self.config.delta_policy == ItemDeltaPolicy::Reconcile {
            if current.product_id != product.product_id {
                self.take_stock(ctx, product.product_id, item.quantity)
                    .await?;
                saga.push(Compensation::ReturnStock {
                    product_id: product.product_id,
                    quantity: item.quantity,
                });

                self.return_stock(ctx, current.product_id, current.quantity)
                    .await?;
                saga.push(Compensation::TakeStock {
                    product_id: current.product_id,
                    quantity: current.quantity,
                });
            } else {
                let delta = item.quantity - current.quantity;
                if delta > 0 {
                    self.take_stock(ctx, product.product_id, delta).await?;
                    saga.push(Compensation::ReturnStock {
                        product_id: product.product_id,
                        quantity: delta,
                    });
                } else if delta < 0 {
                    self.return_stock(ctx, product.product_id, -delta).await?;
                    saga.push(Compensation::TakeStock {
                        product_id: product.product_id,
                        quantity: -delta,
                    });
                }
            }
        }

        let updated = commit(
            ctx,
            Operation::UpdateOrderItem,
            self.order_item_command
                .update_order_item(&UpdateOrderItemRecordRequest {
                    order_item_id: current.order_item_id,
                    order_id,
                    product_id: product.product_id,
                    quantity: item.quantity,
                    price: product.price,
                }),
        )
        .await?;

        saga.push(Compensation::RevertOrderItem(UpdateOrderItemRecordRequest {
            order_item_id: current.order_item_id,
            order_id,
            product_id: current.product_id,
            quantity: current.quantity,
            price: current.price,
        }));

        Ok(updated)
    }

    async fn upsert_shipping(
        &self,
        ctx: &RequestContext,
        order_id: i32,
        req: &UpdateShippingAddressRequest,
        saga: &mut Saga,
    ) -> Result<(), ServiceError> {
        let existing = step(
            ctx,
            Operation::FindShippingAddress,
            self.shipping.find_by_order(order_id),
        )
        .await?;

        let target = match (req.shipping_address_id, existing) {
            (Some(id), Some(current)) if current.shipping_address_id == id => Some(current),
            (Some(id), _) => return Err(ServiceError::ShippingAddressNotFound(id)),
            (None, current) => current,
        };

        match target {
            Some(current) => {
                commit(
                    ctx,
                    Operation::UpdateShippingAddress,
                    self.shipping
                        .update_shipping_address(&UpdateShippingAddressRecordRequest {
                            shipping_address_id: current.shipping_address_id,
                            order_id,
                            details: req.details.clone(),
                        }),
                )
                .await?;
                saga.push(Compensation::RevertShippingAddress(
                    UpdateShippingAddressRecordRequest::from(&current),
                ));
            }
            None => {
                commit(
                    ctx,
                    Operation::CreateShippingAddress,
                    self.shipping
                        .create_shipping_address(&CreateShippingAddressRecordRequest {
                            order_id,
                            details: req.details.clone(),
                        }),
                )
                .await?;
                saga.push(Compensation::DeleteShippingAddress(order_id));
            }
        }

        Ok(())
    }

    async fn revise_order(
        &self,
        ctx: &RequestContext,
        req: &UpdateOrderRequest,
        existing: &[OrderItemModel],
        saga: &mut Saga,
    ) -> Result<OrderModel, ServiceError> {
        for item in &req.items {
            match item.order_item_id {
                Some(order_item_id) => {
                    let current = existing
                        .iter()
                        .find(|i| i.order_item_id == order_item_id)
                        .ok_or(ServiceError::OrderItemNotFound(order_item_id))?;

                    if current.is_trashed() {
                        return Err(ServiceError::OrderItemAlreadyTrashed {
                            order_id: req.order_id,
                            order_item_id,
                        });
                    }

                    self.revise_line(ctx, req.order_id, current, item, saga)
                        .await?;
                }
                None => {
                    let line = CreateOrderItemRequest {
                        product_id: item.product_id,
                        quantity: item.quantity,
                    };
                    self.add_line(ctx, req.order_id, &line, saga).await?;
                }
            }
        }

        self.upsert_shipping(ctx, req.order_id, &req.shipping, saga)
            .await?;

        self.recompute_total(ctx, req.order_id, req.user_id).await
    }

    async fn update(
        &self,
        ctx: &RequestContext,
        req: &UpdateOrderRequest,
    ) -> Result<OrderModel, ServiceError> {
        validate_request(req)?;
        req.ensure_distinct_lines()?;

        let order = self.load_order(ctx, req.order_id).await?;
        if OrderState::from_deleted_at(order.deleted_at) == OrderState::Trashed {
            return Err(ServiceError::OrderAlreadyTrashed(order.order_id));
        }
        self.ensure_user(ctx, req.user_id).await?;

        let existing = self.load_items(ctx, order.order_id).await?;

        let mut saga = Saga::default();
        match self.revise_order(ctx, req, &existing, &mut saga).await {
            Ok(order) => Ok(order),
            Err(err) => {
                self.unwind(saga, &err).await;
                Err(err)
            }
        }
    }

    /// Undoes completed steps under a fresh bounded context. Returns whether every step
    /// was undone; failures are logged and never replace `cause`.
    async fn unwind(&self, saga: Saga, cause: &ServiceError) -> bool {
        if saga.is_empty() {
            return true;
        }

        warn!(
            "↩️ Unwinding {} completed steps after failure: {}",
            saga.len(),
            cause
        );

        let ctx = RequestContext::with_timeout(self.config.compensation_timeout);
        let mut clean = true;

        for compensation in saga.into_unwind_order() {
            if let Err(err) = self.compensate(&ctx, &compensation).await {
                clean = false;
                error!(
                    "❌ Compensation {:?} failed while handling '{}': {}",
                    compensation, cause, err
                );
            }
        }

        clean
    }

    async fn compensate(
        &self,
        ctx: &RequestContext,
        compensation: &Compensation,
    ) -> Result<(), ServiceError> {
        match compensation {
            Compensation::DeleteOrder(id) => {
                commit(ctx, Operation::DeleteOrder, self.command.delete_order(*id)).await?;
            }
            Compensation::ReturnStock {
                product_id,
                quantity,
            } => {
                self.return_stock(ctx, *product_id, *quantity).await?;
            }
            Compensation::TakeStock {
                product_id,
                quantity,
            } => {
                self.take_stock(ctx, *product_id, *quantity).await?;
            }
            Compensation::DeleteOrderItem(id) => {
                commit(
                    ctx,
                    Operation::DeleteOrderItem,
                    self.order_item_command.delete_order_item_permanent(*id),
                )
                .await?;
            }
            Compensation::RevertOrderItem(previous) => {
                commit(
                    ctx,
                    Operation::UpdateOrderItem,
                    self.order_item_command.update_order_item(previous),
                )
                .await?;
            }
            Compensation::TrashOrderItem(id) => {
                commit(
                    ctx,
                    Operation::TrashOrderItem,
                    self.order_item_command.trashed_order_item(*id),
                )
                .await?;
            }
            Compensation::RestoreOrderItem(id) => {
                commit(
                    ctx,
                    Operation::RestoreOrderItem,
                    self.order_item_command.restore_order_item(*id),
                )
                .await?;
            }
            Compensation::DeleteShippingAddress(order_id) => {
                commit(
                    ctx,
                    Operation::DeleteShippingAddress,
                    self.shipping.delete_by_order(*order_id),
                )
                .await?;
            }
            Compensation::RevertShippingAddress(previous) => {
                commit(
                    ctx,
                    Operation::UpdateShippingAddress,
                    self.shipping.update_shipping_address(previous),
                )
                .await?;
            }
        }

        info!("↩️ Compensated {:?}", compensation);
        Ok(())
    }

    async fn record_intent(
        &self,
        ctx: &RequestContext,
        order_id: i32,
        action: LifecycleAction,
    ) -> Result<LifecycleIntent, ServiceError> {
        let remaining = ctx
            .deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()));
        let lease = self.config.lease_for(remaining);

        commit(
            ctx,
            Operation::RecordIntent,
            self.intents.record_intent(order_id, action, lease),
        )
        .await
    }

    /// Hands an unfinished intent over to recovery. If this fails the lease simply
    /// runs out.
    async fn release_intent(&self, intent: &LifecycleIntent) {
        let ctx = RequestContext::with_timeout(self.config.compensation_timeout);
        match commit(
            &ctx,
            Operation::ReleaseIntent,
            self.intents.release_intent(intent.intent_id),
        )
        .await
        {
            Ok(()) => warn!(
                "⚠️ {} intent {} for order {} left pending for recovery",
                intent.action, intent.intent_id, intent.order_id
            ),
            Err(err) => error!(
                "❌ Could not release {} intent {} for order {}: {}",
                intent.action, intent.intent_id, intent.order_id, err
            ),
        }
    }

    /// The cascade already reached its end state, so a failure here only delays cleanup
    /// until the next recovery pass.
    async fn close_intent(&self, intent: &LifecycleIntent) {
        let ctx = RequestContext::with_timeout(self.config.compensation_timeout);
        if let Err(err) = commit(
            &ctx,
            Operation::CompleteIntent,
            self.intents.complete_intent(intent.intent_id),
        )
        .await
        {
            error!(
                "❌ Could not complete {} intent {} for order {}: {}",
                intent.action, intent.intent_id, intent.order_id, err
            );
        }
    }

    /// Trashes every active item, then the header.
    async fn cascade_trash(
        &self,
        ctx: &RequestContext,
        order_id: i32,
        items: &[OrderItemModel],
        saga: &mut Saga,
    ) -> Result<OrderModel, ServiceError> {
        for item in items.iter().filter(|i| !i.is_trashed()) {
            commit(
                ctx,
                Operation::TrashOrderItem,
                self.order_item_command.trashed_order_item(item.order_item_id),
            )
            .await?;
            saga.push(Compensation::RestoreOrderItem(item.order_item_id));
        }

        commit(ctx, Operation::TrashOrder, self.command.trash_order(order_id)).await
    }

    /// Restores every trashed item, then the header.
    async fn cascade_restore(
        &self,
        ctx: &RequestContext,
        order_id: i32,
        items: &[OrderItemModel],
        saga: &mut Saga,
    ) -> Result<OrderModel, ServiceError> {
        for item in items.iter().filter(|i| i.is_trashed()) {
            commit(
                ctx,
                Operation::RestoreOrderItem,
                self.order_item_command.restore_order_item(item.order_item_id),
            )
            .await?;
            saga.push(Compensation::TrashOrderItem(item.order_item_id));
        }

        commit(
            ctx,
            Operation::RestoreOrder,
            self.command.restore_order(order_id),
        )
        .await
    }

    /// Deletes items (returning their units), the shipping record, then the header.
    /// Every step tolerates rows that are already gone.
    async fn cascade_purge(
        &self,
        ctx: &RequestContext,
        order_id: i32,
        items: &[OrderItemModel],
    ) -> Result<(), ServiceError> {
        for item in items {
            let deleted = commit(
                ctx,
                Operation::DeleteOrderItem,
                self.order_item_command
                    .delete_order_item_permanent(item.order_item_id),
            )
            .await?;

            if deleted {
                self.return_stock(ctx, item.product_id, item.quantity)
                    .await?;
            }
        }

        commit(
            ctx,
            Operation::DeleteShippingAddress,
            self.shipping.delete_by_order(order_id),
        )
        .await?;

        commit(ctx, Operation::DeleteOrder, self.command.delete_order(order_id)).await?;

        Ok(())
    }

    /// Settles a reversible cascade. On failure the completed steps are undone; the
    /// intent stays pending only when undoing fails too.
    async fn settle_reversible(
        &self,
        intent: &LifecycleIntent,
        saga: Saga,
        result: Result<OrderModel, ServiceError>,
    ) -> Result<OrderModel, ServiceError> {
        match result {
            Ok(order) => {
                self.close_intent(intent).await;
                Ok(order)
            }
            Err(err) => {
                if self.unwind(saga, &err).await {
                    self.close_intent(intent).await;
                } else {
                    self.release_intent(intent).await;
                }
                Err(err)
            }
        }
    }

    async fn trash(&self, ctx: &RequestContext, id: i32) -> Result<OrderModel, ServiceError> {
        let order = self.load_order(ctx, id).await?;
        OrderState::from_deleted_at(order.deleted_at).apply(LifecycleAction::Trash, id)?;

        let items = self.load_items(ctx, id).await?;
        if let Some(item) = items.iter().find(|i| i.is_trashed()) {
            return Err(ServiceError::OrderItemAlreadyTrashed {
                order_id: id,
                order_item_id: item.order_item_id,
            });
        }

        let intent = self.record_intent(ctx, id, LifecycleAction::Trash).await?;
        let mut saga = Saga::default();
        let result = self.cascade_trash(ctx, id, &items, &mut saga).await;

        self.settle_reversible(&intent, saga, result).await
    }

    async fn restore(&self, ctx: &RequestContext, id: i32) -> Result<OrderModel, ServiceError> {
        let order = self.load_order(ctx, id).await?;
        OrderState::from_deleted_at(order.deleted_at).apply(LifecycleAction::Restore, id)?;

        let items = self.load_items(ctx, id).await?;

        let intent = self.record_intent(ctx, id, LifecycleAction::Restore).await?;
        let mut saga = Saga::default();
        let result = self.cascade_restore(ctx, id, &items, &mut saga).await;

        self.settle_reversible(&intent, saga, result).await
    }

    async fn purge(&self, ctx: &RequestContext, id: i32) -> Result<(), ServiceError> {
        let order = self.load_order(ctx, id).await?;
        OrderState::from_deleted_at(order.deleted_at).apply(LifecycleAction::Purge, id)?;

        let items = self.load_items(ctx, id).await?;
        let intent = self.record_intent(ctx, id, LifecycleAction::Purge).await?;

        match self.cascade_purge(ctx, id, &items).await {
            Ok(()) => {
                self.close_intent(&intent).await;
                Ok(())
            }
            Err(err) => {
                error!("❌ Purge of order {} stopped: {}", id, err);
                self.release_intent(&intent).await;
                Err(err)
            }
        }
    }

    async fn restore_all(&self, ctx: &RequestContext) -> Result<(), ServiceError> {
        let items = commit(
            ctx,
            Operation::RestoreAllOrderItems,
            self.order_item_command.restore_all_order_item(),
        )
        .await?;

        let orders = commit(
            ctx,
            Operation::RestoreAllOrders,
            self.command.restore_all_orders(),
        )
        .await?;

        info!("✅ Restored {} orders and {} order items", orders, items);
        Ok(())
    }

    async fn delete_all(&self, ctx: &RequestContext) -> Result<(), ServiceError> {
        let items = commit(
            ctx,
            Operation::DeleteAllOrderItems,
            self.order_item_command.delete_all_order_item_permanent(),
        )
        .await?;

        for item in &items {
            self.return_stock(ctx, item.product_id, item.quantity)
                .await?;
        }

        let order_ids = commit(
            ctx,
            Operation::DeleteAllOrders,
            self.command.delete_all_orders(),
        )
        .await?;

        for order_id in &order_ids {
            commit(
                ctx,
                Operation::DeleteShippingAddress,
                self.shipping.delete_by_order(*order_id),
            )
            .await?;
        }

        info!(
            "✅ Permanently deleted {} orders and {} order items",
            order_ids.len(),
            items.len()
        );
        Ok(())
    }

    /// Rolls one pending intent forward to its end state.
    async fn roll_forward(
        &self,
        ctx: &RequestContext,
        intent: &LifecycleIntent,
    ) -> Result<(), ServiceError> {
        let order = step(
            ctx,
            Operation::FindOrder,
            self.query.find_by_id(intent.order_id),
        )
        .await?;
        let items = self.load_items(ctx, intent.order_id).await?;

        match (intent.action, order) {
            (LifecycleAction::Trash | LifecycleAction::Restore, None) => {
                info!(
                    "ℹ️ Order {} no longer exists, closing {} intent {}",
                    intent.order_id, intent.action, intent.intent_id
                );
            }
            (LifecycleAction::Trash, Some(_)) => {
                let mut saga = Saga::default();
                self.cascade_trash(ctx, intent.order_id, &items, &mut saga)
                    .await?;
            }
            (LifecycleAction::Restore, Some(_)) => {
                let mut saga = Saga::default();
                self.cascade_restore(ctx, intent.order_id, &items, &mut saga)
                    .await?;
            }
            (LifecycleAction::Purge, _) => {
                self.cascade_purge(ctx, intent.order_id, &items).await?;
            }
        }

        commit(
            ctx,
            Operation::CompleteIntent,
            self.intents.complete_intent(intent.intent_id),
        )
        .await
    }

    async fn recover(&self, ctx: &RequestContext) -> Result<usize, ServiceError> {
        let pending = commit(
            ctx,
            Operation::ClaimIntents,
            self.intents.claim_pending(self.config.intent_lease),
        )
        .await?;

        if pending.is_empty() {
            return Ok(0);
        }

        info!("🩹 Recovering {} pending lifecycle cascades", pending.len());

        let mut completed = 0;
        for intent in &pending {
            match self.roll_forward(ctx, intent).await {
                Ok(()) => {
                    completed += 1;
                    info!(
                        "✅ Rolled {} intent {} forward for order {}",
                        intent.action, intent.intent_id, intent.order_id
                    );
                }
                Err(err @ (ServiceError::Cancelled | ServiceError::DeadlineExceeded)) => {
                    return Err(err);
                }
                Err(err) => {
                    error!(
                        "❌ Failed to roll {} intent {} forward for order {}: {}",
                        intent.action, intent.intent_id, intent.order_id, err
                    );
                }
            }
        }

        Ok(completed)
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create_order(
        &self,
        ctx: &RequestContext,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!(
            "🏗️ Creating new order for merchant_id={} user_id={}",
            req.merchant_id, req.user_id
        );

        let tracing_ctx = self.instrumentation.start_tracing(
            "create_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "create"),
                KeyValue::new("order.merchant_id", req.merchant_id.to_string()),
                KeyValue::new("order.user_id", req.user_id.to_string()),
                KeyValue::new("order.items", req.items.len().to_string()),
            ],
        );

        let result = self.create(ctx, req).await;
        self.finish(&tracing_ctx, Method::Post, &result, "Order created successfully");

        let order = result?;
        info!(
            "✅ Order created: order_id={} total_price={}",
            order.order_id, order.total_price
        );

        Ok(ApiResponse::success(
            "Order created successfully",
            OrderResponse::from(order),
        ))
    }

    async fn update_order(
        &self,
        ctx: &RequestContext,
        req: &UpdateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!("🔄 Updating order_id={}", req.order_id);

        let tracing_ctx = self.instrumentation.start_tracing(
            "update_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "update"),
                KeyValue::new("order.id", req.order_id.to_string()),
                KeyValue::new("order.delta_policy", self.config.delta_policy.to_string()),
            ],
        );

        let result = self.update(ctx, req).await;
        self.finish(&tracing_ctx, Method::Put, &result, "Order updated successfully");

        let order = result?;
        info!(
            "✅ Order updated: order_id={} total_price={}",
            order.order_id, order.total_price
        );

        Ok(ApiResponse::success(
            "Order updated successfully",
            OrderResponse::from(order),
        ))
    }

    async fn trash_order(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ApiResponse<OrderResponseDeleteAt>, ServiceError> {
        info!("🗑️ Trashing order id={id}");

        let tracing_ctx = self.instrumentation.start_tracing(
            "trash_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "trash"),
                KeyValue::new("order.id", id.to_string()),
            ],
        );

        let result = self.trash(ctx, id).await;
        self.finish(&tracing_ctx, Method::Delete, &result, "Order trashed successfully");

        Ok(ApiResponse::success(
            "Order trashed successfully",
            OrderResponseDeleteAt::from(result?),
        ))
    }

    async fn restore_order(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ApiResponse<OrderResponseDeleteAt>, ServiceError> {
        info!("♻️ Restoring order id={id}");

        let tracing_ctx = self.instrumentation.start_tracing(
            "restore_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "restore"),
                KeyValue::new("order.id", id.to_string()),
            ],
        );

        let result = self.restore(ctx, id).await;
        self.finish(&tracing_ctx, Method::Put, &result, "Order restored successfully");

        Ok(ApiResponse::success(
            "Order restored successfully",
            OrderResponseDeleteAt::from(result?),
        ))
    }

    async fn delete_order(
        &self,
        ctx: &RequestContext,
        id: i32,
    ) -> Result<ApiResponse<()>, ServiceError> {
        info!("🧨 Permanently deleting order id={id}");

        let tracing_ctx = self.instrumentation.start_tracing(
            "delete_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "delete_permanent"),
                KeyValue::new("order.id", id.to_string()),
            ],
        );

        let result = self.purge(ctx, id).await;
        self.finish(
            &tracing_ctx,
            Method::Delete,
            &result,
            "Order permanently deleted",
        );
        result?;

        Ok(ApiResponse::success("Order permanently deleted", ()))
    }

    async fn restore_all_order(
        &self,
        ctx: &RequestContext,
    ) -> Result<ApiResponse<()>, ServiceError> {
        info!("🔄 Restoring all trashed orders");

        let tracing_ctx = self.instrumentation.start_tracing(
            "restore_all_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "restore_all"),
            ],
        );

        let result = self.restore_all(ctx).await;
        self.finish(
            &tracing_ctx,
            Method::Put,
            &result,
            "All trashed orders restored successfully",
        );
        result?;

        Ok(ApiResponse::success(
            "All trashed orders restored successfully",
            (),
        ))
    }

    async fn delete_all_order(
        &self,
        ctx: &RequestContext,
    ) -> Result<ApiResponse<()>, ServiceError> {
        info!("💣 Permanently deleting all trashed orders");

        let tracing_ctx = self.instrumentation.start_tracing(
            "delete_all_order",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "delete_all_permanent"),
            ],
        );

        let result = self.delete_all(ctx).await;
        self.finish(
            &tracing_ctx,
            Method::Delete,
            &result,
            "All trashed orders permanently deleted",
        );
        result?;

        Ok(ApiResponse::success(
            "All trashed orders permanently deleted",
            (),
        ))
    }

    async fn recover_pending_cascades(
        &self,
        ctx: &RequestContext,
    ) -> Result<ApiResponse<usize>, ServiceError> {
        let tracing_ctx = self.instrumentation.start_tracing(
            "recover_pending_cascades",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("operation", "recover"),
            ],
        );

        let result = self.recover(ctx).await;
        self.finish(
            &tracing_ctx,
            Method::Post,
            &result,
            "Pending lifecycle cascades recovered",
        );

        Ok(ApiResponse::success(
            "Pending lifecycle cascades recovered",
            result?,
        ))
    }
}
