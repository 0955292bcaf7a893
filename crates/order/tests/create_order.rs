mod common;

use common::{Harness, create_request};
use order::abstract_trait::order::service::OrderCommandServiceTrait;
use shared::{
    errors::{ErrorKind, Operation, ServiceError},
    utils::{Method, RequestContext, Status},
};
use std::time::Duration;

#[tokio::test]
async fn creates_order_with_items_shipping_and_total() {
    let h = Harness::seeded(5);
    let ctx = RequestContext::background();

    let response = h
        .service
        .create_order(&ctx, &create_request(&[(10, 2)]))
        .await
        .expect("create order");

    assert_eq!(response.status, "success");
    assert_eq!(response.data.merchant_id, 7);
    assert_eq!(response.data.user_id, 3);
    assert_eq!(response.data.total_price, 1000);
    assert_eq!(h.store.stock(10), 3);

    let items = h.store.items_of(response.data.id);
    assert_eq!(items.len(), 1);
    assert_eq!((items[0].product_id, items[0].quantity, items[0].price), (10, 2, 500));

    let shipping = h.store.shipping_of(response.data.id).expect("shipping");
    assert_eq!(shipping.courier, "JNE");

    assert_eq!(h.metrics.records(), vec![(Method::Post, Status::Success)]);
}

#[tokio::test]
async fn total_covers_every_line() {
    let h = Harness::seeded(10);
    h.store.seed_product(11, 1250, 4);
    let ctx = RequestContext::background();

    let response = h
        .service
        .create_order(&ctx, &create_request(&[(10, 3), (11, 2)]))
        .await
        .expect("create order");

    assert_eq!(response.data.total_price, 3 * 500 + 2 * 1250);
    assert_eq!(h.store.stock(10), 7);
    assert_eq!(h.store.stock(11), 2);
}

#[tokio::test]
async fn insufficient_stock_leaves_nothing_behind() {
    let h = Harness::seeded(1);
    let ctx = RequestContext::background();

    let err = h
        .service
        .create_order(&ctx, &create_request(&[(10, 2)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::InsufficientStock {
            product_id: 10,
            requested: 2,
            available: 1
        }
    ));
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);
    assert_eq!(h.store.stock(10), 1);
    assert_eq!(h.store.order_count(), 0);
    assert_eq!(h.store.item_count(), 0);
    assert_eq!(h.store.shipping_count(), 0);
    assert_eq!(h.metrics.records(), vec![(Method::Post, Status::Error)]);
}

#[tokio::test]
async fn failure_on_later_line_returns_stock_taken_by_earlier_lines() {
    let h = Harness::seeded(5);
    h.store.seed_product(11, 900, 0);
    let ctx = RequestContext::background();

    let err = h
        .service
        .create_order(&ctx, &create_request(&[(10, 2), (11, 1)]))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INSUFFICIENT_STOCK");
    assert_eq!(h.store.stock(10), 5);
    assert_eq!(h.store.stock(11), 0);
    assert_eq!(h.store.order_count(), 0);
    assert_eq!(h.store.item_count(), 0);
}

#[tokio::test]
async fn unknown_merchant_user_or_product_is_not_found() {
    let h = Harness::seeded(5);
    let ctx = RequestContext::background();

    let mut req = create_request(&[(10, 1)]);
    req.merchant_id = 99;
    let err = h.service.create_order(&ctx, &req).await.unwrap_err();
    assert!(matches!(err, ServiceError::MerchantNotFound(99)));

    let mut req = create_request(&[(10, 1)]);
    req.user_id = 98;
    let err = h.service.create_order(&ctx, &req).await.unwrap_err();
    assert!(matches!(err, ServiceError::UserNotFound(98)));

    let err = h
        .service
        .create_order(&ctx, &create_request(&[(77, 1)]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ProductNotFound(77)));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(h.store.order_count(), 0);
    assert_eq!(h.store.stock(10), 5);
}

#[tokio::test]
async fn invalid_request_is_rejected_before_any_store_call() {
    let h = Harness::seeded(5);
    h.store.fail("find_merchant");
    let ctx = RequestContext::background();

    let err = h
        .service
        .create_order(&ctx, &create_request(&[]))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let mut req = create_request(&[(10, 0)]);
    req.shipping.courier.clear();
    match h.service.create_order(&ctx, &req).await.unwrap_err() {
        ServiceError::Validation(messages) => {
            assert!(messages.iter().any(|m| m.starts_with("items[0].quantity")));
            assert!(messages.iter().any(|m| m.starts_with("shipping.courier")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn shipping_failure_unwinds_items_stock_and_header() {
    let h = Harness::seeded(5);
    h.store.fail("create_shipping_address");
    let ctx = RequestContext::background();

    let err = h
        .service
        .create_order(&ctx, &create_request(&[(10, 2)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::OperationFailed {
            operation: Operation::CreateShippingAddress,
            ..
        }
    ));
    assert_eq!(err.code(), "SHIPPING_ADDRESS_CREATE_FAILED");
    assert_eq!(h.store.stock(10), 5);
    assert_eq!(h.store.order_count(), 0);
    assert_eq!(h.store.item_count(), 0);
}

#[tokio::test]
async fn header_update_failure_unwinds_everything() {
    let h = Harness::seeded(5);
    h.store.fail("update_order");
    let ctx = RequestContext::background();

    let err = h
        .service
        .create_order(&ctx, &create_request(&[(10, 2)]))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "ORDER_UPDATE_FAILED");
    assert_eq!(h.store.stock(10), 5);
    assert_eq!(h.store.order_count(), 0);
    assert_eq!(h.store.shipping_count(), 0);
}

#[tokio::test]
async fn failed_compensation_does_not_mask_original_error() {
    let h = Harness::seeded(5);
    h.store.fail("create_shipping_address");
    h.store.fail("increase_stock");
    let ctx = RequestContext::background();

    let err = h
        .service
        .create_order(&ctx, &create_request(&[(10, 2)]))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "SHIPPING_ADDRESS_CREATE_FAILED");
    // the stock return could not run; every other step was still undone
    assert_eq!(h.store.stock(10), 3);
    assert_eq!(h.store.order_count(), 0);
    assert_eq!(h.store.item_count(), 0);
}

#[tokio::test]
async fn deadline_expiry_is_reported_and_compensated() {
    let h = Harness::seeded(5);
    h.store
        .delay("create_order_item", Duration::from_millis(300));
    let ctx = RequestContext::with_timeout(Duration::from_millis(50));

    let err = h
        .service
        .create_order(&ctx, &create_request(&[(10, 2)]))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::DeadlineExceeded));
    assert_eq!(err.kind(), ErrorKind::DeadlineExceeded);
    assert_eq!(h.store.stock(10), 5);
    assert_eq!(h.store.order_count(), 0);
}

#[tokio::test]
async fn cancelled_context_performs_no_work() {
    let h = Harness::seeded(5);
    let (ctx, handle) = RequestContext::background().cancellable();
    handle.cancel();

    let err = h
        .service
        .create_order(&ctx, &create_request(&[(10, 2)]))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Cancelled));
    assert_eq!(h.store.order_count(), 0);
    assert_eq!(h.store.stock(10), 5);
}

#[tokio::test]
async fn stock_write_finishing_after_cancel_is_still_undone() {
    let h = Harness::seeded(5);
    h.store.settle("decrease_stock", Duration::from_millis(200));
    let (ctx, handle) = RequestContext::background().cancellable();

    let cancel = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
    };
    let req = create_request(&[(10, 2)]);
    let (result, ()) = tokio::join!(
        h.service.create_order(&ctx, &req),
        cancel
    );

    assert!(matches!(result.unwrap_err(), ServiceError::Cancelled));
    assert_eq!(h.store.stock(10), 5);
    assert_eq!(h.store.order_count(), 0);
    assert_eq!(h.store.item_count(), 0);
}

#[tokio::test]
async fn concurrent_orders_cannot_oversell() {
    let h = Harness::seeded(3);
    // both calls read stock 3 before either decrements
    h.store.delay("find_product", Duration::from_millis(50));
    let ctx = RequestContext::background();
    let req = create_request(&[(10, 2)]);

    let (first, second) = tokio::join!(
        h.service.create_order(&ctx, &req),
        h.service.create_order(&ctx, &req)
    );

    let results = [first, second];
    let refused: Vec<_> = results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .collect();
    assert_eq!(refused.len(), 1);
    assert!(matches!(
        refused[0],
        ServiceError::InsufficientStock {
            product_id: 10,
            requested: 2,
            available: 1
        }
    ));
    assert_eq!(h.store.stock(10), 1);
    assert_eq!(h.store.order_count(), 1);
    assert_eq!(h.store.item_count(), 1);
}

#[tokio::test]
async fn product_removed_mid_order_is_not_found() {
    let h = Harness::seeded(5);
    h.store.delay("decrease_stock", Duration::from_millis(100));
    let ctx = RequestContext::background();

    let remove = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        h.store.remove_product_directly(10);
    };
    let req = create_request(&[(10, 2)]);
    let (result, ()) = tokio::join!(
        h.service.create_order(&ctx, &req),
        remove
    );

    assert!(matches!(result.unwrap_err(), ServiceError::ProductNotFound(10)));
    assert_eq!(h.store.order_count(), 0);
}
