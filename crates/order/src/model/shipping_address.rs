use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShippingAddress {
    pub shipping_address_id: i32,
    pub order_id: i32,
    pub address: String,
    pub province: String,
    pub city: String,
    pub country: String,
    pub courier: String,
    pub shipping_method: String,
    pub shipping_cost: i32,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub deleted_at: Option<NaiveDateTime>,
}
