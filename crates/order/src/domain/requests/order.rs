use crate::domain::requests::shipping_address::{
    CreateShippingAddressRequest, UpdateShippingAddressRequest,
};
use serde::{Deserialize, Serialize};
use shared::errors::ServiceError;
use std::collections::{HashMap, hash_map::Entry};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct FindAllOrder {
    pub search: String,

    pub page: i32,

    #[serde(rename = "page_size")]
    pub page_size: i32,
}

impl FindAllOrder {
    /// Page defaults to 1 and page size to 10 when non-positive.
    pub fn normalized(&self) -> Self {
        Self {
            search: self.search.trim().to_string(),
            page: if self.page > 0 { self.page } else { 1 },
            page_size: if self.page_size > 0 { self.page_size } else { 10 },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CreateOrderRequest {
    #[validate(range(min = 1))]
    #[serde(rename = "merchant_id")]
    pub merchant_id: i32,

    #[validate(range(min = 1))]
    #[serde(rename = "user_id")]
    pub user_id: i32,

    #[validate(length(min = 1), nested)]
    pub items: Vec<CreateOrderItemRequest>,

    #[validate(nested)]
    pub shipping: CreateShippingAddressRequest,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CreateOrderItemRequest {
    #[validate(range(min = 1))]
    #[serde(rename = "product_id")]
    pub product_id: i32,

    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct UpdateOrderRequest {
    #[validate(range(min = 1))]
    #[serde(rename = "order_id")]
    pub order_id: i32,

    #[validate(range(min = 1))]
    #[serde(rename = "user_id")]
    pub user_id: i32,

    #[validate(length(min = 1), nested)]
    pub items: Vec<UpdateOrderItemRequest>,

    #[validate(nested)]
    pub shipping: UpdateShippingAddressRequest,
}

impl UpdateOrderRequest {
    /// Each existing line may be revised at most once per request.
    pub fn ensure_distinct_lines(&self) -> Result<(), ServiceError> {
        let mut first_seen = HashMap::new();
        let mut messages = Vec::new();

        for (index, item) in self.items.iter().enumerate() {
            let Some(order_item_id) = item.order_item_id else {
                continue;
            };
            match first_seen.entry(order_item_id) {
                Entry::Occupied(first) => messages.push(format!(
                    "items[{index}].order_item_id: Line {order_item_id} already revised by items[{}]",
                    first.get()
                )),
                Entry::Vacant(slot) => {
                    slot.insert(index);
                }
            }
        }

        if messages.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(messages))
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct UpdateOrderItemRequest {
    /// `None` adds a new line to the order.
    #[validate(range(min = 1))]
    #[serde(rename = "order_item_id", default)]
    pub order_item_id: Option<i32>,

    #[validate(range(min = 1))]
    #[serde(rename = "product_id")]
    pub product_id: i32,

    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateOrderRecordRequest {
    pub merchant_id: i32,
    pub user_id: i32,
    pub total_price: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdateOrderRecordRequest {
    pub order_id: i32,
    pub user_id: i32,
    pub total_price: i64,
}
