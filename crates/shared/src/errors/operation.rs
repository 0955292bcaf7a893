use std::fmt;

/// Collaborator call that failed inside an order command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FindMerchant,
    FindUser,
    FindProduct,
    DecreaseStock,
    IncreaseStock,
    FindOrder,
    CreateOrder,
    UpdateOrder,
    TrashOrder,
    RestoreOrder,
    DeleteOrder,
    RestoreAllOrders,
    DeleteAllOrders,
    FindOrderItems,
    CreateOrderItem,
    UpdateOrderItem,
    TrashOrderItem,
    RestoreOrderItem,
    DeleteOrderItem,
    RestoreAllOrderItems,
    DeleteAllOrderItems,
    CalculateTotal,
    FindShippingAddress,
    CreateShippingAddress,
    UpdateShippingAddress,
    DeleteShippingAddress,
    RecordIntent,
    CompleteIntent,
    ReleaseIntent,
    ClaimIntents,
}

impl Operation {
    pub fn code(&self) -> &'static str {
        match self {
            Operation::FindMerchant => "MERCHANT_FIND_FAILED",
            Operation::FindUser => "USER_FIND_FAILED",
            Operation::FindProduct => "PRODUCT_FIND_FAILED",
            Operation::DecreaseStock => "STOCK_DECREASE_FAILED",
            Operation::IncreaseStock => "STOCK_INCREASE_FAILED",
            Operation::FindOrder => "ORDER_FIND_FAILED",
            Operation::CreateOrder => "ORDER_CREATE_FAILED",
            Operation::UpdateOrder => "ORDER_UPDATE_FAILED",
            Operation::TrashOrder => "ORDER_TRASH_FAILED",
            Operation::RestoreOrder => "ORDER_RESTORE_FAILED",
            Operation::DeleteOrder => "ORDER_DELETE_FAILED",
            Operation::RestoreAllOrders => "ORDER_RESTORE_ALL_FAILED",
            Operation::DeleteAllOrders => "ORDER_DELETE_ALL_FAILED",
            Operation::FindOrderItems => "ORDER_ITEM_FIND_FAILED",
            Operation::CreateOrderItem => "ORDER_ITEM_CREATE_FAILED",
            Operation::UpdateOrderItem => "ORDER_ITEM_UPDATE_FAILED",
            Operation::TrashOrderItem => "ORDER_ITEM_TRASH_FAILED",
            Operation::RestoreOrderItem => "ORDER_ITEM_RESTORE_FAILED",
            Operation::DeleteOrderItem => "ORDER_ITEM_DELETE_FAILED",
            Operation::RestoreAllOrderItems => "ORDER_ITEM_RESTORE_ALL_FAILED",
            Operation::DeleteAllOrderItems => "ORDER_ITEM_DELETE_ALL_FAILED",
            Operation::CalculateTotal => "ORDER_TOTAL_FAILED",
            Operation::FindShippingAddress => "SHIPPING_ADDRESS_FIND_FAILED",
            Operation::CreateShippingAddress => "SHIPPING_ADDRESS_CREATE_FAILED",
            Operation::UpdateShippingAddress => "SHIPPING_ADDRESS_UPDATE_FAILED",
            Operation::DeleteShippingAddress => "SHIPPING_ADDRESS_DELETE_FAILED",
            Operation::RecordIntent => "LIFECYCLE_INTENT_RECORD_FAILED",
            Operation::CompleteIntent => "LIFECYCLE_INTENT_COMPLETE_FAILED",
            Operation::ReleaseIntent => "LIFECYCLE_INTENT_RELEASE_FAILED",
            Operation::ClaimIntents => "LIFECYCLE_INTENT_CLAIM_FAILED",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Operation::FindMerchant => "find merchant",
            Operation::FindUser => "find user",
            Operation::FindProduct => "find product",
            Operation::DecreaseStock => "decrease stock",
            Operation::IncreaseStock => "increase stock",
            Operation::FindOrder => "find order",
            Operation::CreateOrder => "create order",
            Operation::UpdateOrder => "update order",
            Operation::TrashOrder => "trash order",
            Operation::RestoreOrder => "restore order",
            Operation::DeleteOrder => "delete order",
            Operation::RestoreAllOrders => "restore all orders",
            Operation::DeleteAllOrders => "delete all orders",
            Operation::FindOrderItems => "find order items",
            Operation::CreateOrderItem => "create order item",
            Operation::UpdateOrderItem => "update order item",
            Operation::TrashOrderItem => "trash order item",
            Operation::RestoreOrderItem => "restore order item",
            Operation::DeleteOrderItem => "delete order item",
            Operation::RestoreAllOrderItems => "restore all order items",
            Operation::DeleteAllOrderItems => "delete all order items",
            Operation::CalculateTotal => "calculate order total",
            Operation::FindShippingAddress => "find shipping address",
            Operation::CreateShippingAddress => "create shipping address",
            Operation::UpdateShippingAddress => "update shipping address",
            Operation::DeleteShippingAddress => "delete shipping address",
            Operation::RecordIntent => "record lifecycle intent",
            Operation::CompleteIntent => "complete lifecycle intent",
            Operation::ReleaseIntent => "release lifecycle intent",
            Operation::ClaimIntents => "claim lifecycle intents",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}
