use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub order_item_id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub price: i32,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
    pub deleted_at: Option<NaiveDateTime>,
}

impl OrderItem {
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn subtotal(&self) -> i64 {
        i64::from(self.price) * i64::from(self.quantity)
    }
}
