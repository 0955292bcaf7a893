mod common;

use common::{Harness, create_request};
use order::abstract_trait::order::service::OrderCommandServiceTrait;
use shared::{
    errors::{ErrorKind, Operation, ServiceError},
    utils::RequestContext,
};

async fn place_order(h: &Harness, quantity: i32) -> i32 {
    h.service
        .create_order(
            &RequestContext::background(),
            &create_request(&[(10, quantity)]),
        )
        .await
        .expect("create order")
        .data
        .id
}

#[tokio::test]
async fn restore_all_brings_back_every_trashed_order_and_item() {
    let h = Harness::seeded(20);
    let ctx = RequestContext::background();
    let first = place_order(&h, 1).await;
    let second = place_order(&h, 2).await;
    h.service.trash_order(&ctx, first).await.expect("trash");
    h.service.trash_order(&ctx, second).await.expect("trash");

    let response = h.service.restore_all_order(&ctx).await.expect("restore all");

    assert_eq!(response.status, "success");
    for id in [first, second] {
        assert!(h.store.order(id).expect("order").deleted_at.is_none());
        assert!(h.store.items_of(id).iter().all(|i| !i.is_trashed()));
    }
}

#[tokio::test]
async fn delete_all_purges_trashed_orders_only() {
    let h = Harness::seeded(20);
    let ctx = RequestContext::background();
    let kept = place_order(&h, 1).await;
    let purged = place_order(&h, 4).await;
    h.service.trash_order(&ctx, purged).await.expect("trash");
    assert_eq!(h.store.stock(10), 15);

    h.service.delete_all_order(&ctx).await.expect("delete all");

    assert!(h.store.order(purged).is_none());
    assert!(h.store.items_of(purged).is_empty());
    assert!(h.store.shipping_of(purged).is_none());
    assert_eq!(h.store.stock(10), 19);

    assert!(h.store.order(kept).is_some());
    assert_eq!(h.store.items_of(kept).len(), 1);
    assert!(h.store.shipping_of(kept).is_some());
}

#[tokio::test]
async fn item_layer_failure_aborts_before_orders_are_touched() {
    let h = Harness::seeded(20);
    let ctx = RequestContext::background();
    let order_id = place_order(&h, 1).await;
    h.service.trash_order(&ctx, order_id).await.expect("trash");
    h.store.fail("restore_all_order_item");

    let err = h.service.restore_all_order(&ctx).await.unwrap_err();

    assert!(matches!(
        err,
        ServiceError::OperationFailed {
            operation: Operation::RestoreAllOrderItems,
            ..
        }
    ));
    assert_eq!(err.kind(), ErrorKind::OperationFailed);
    assert!(h.store.order(order_id).expect("order").deleted_at.is_some());
}

#[tokio::test]
async fn order_layer_failure_reports_its_own_error() {
    let h = Harness::seeded(20);
    let ctx = RequestContext::background();
    let order_id = place_order(&h, 1).await;
    h.service.trash_order(&ctx, order_id).await.expect("trash");
    h.store.fail("delete_all_orders");

    let err = h.service.delete_all_order(&ctx).await.unwrap_err();

    assert_eq!(err.code(), "ORDER_DELETE_ALL_FAILED");
    assert!(h.store.items_of(order_id).is_empty());
    assert!(h.store.order(order_id).is_some());
}
