use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateOrderItemRecordRequest {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdateOrderItemRecordRequest {
    pub order_item_id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price: i32,
}
