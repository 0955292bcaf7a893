use crate::model::order::Order as OrderModel;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderResponse {
    pub id: i32,
    pub merchant_id: i32,
    pub user_id: i32,
    pub total_price: i64,
    #[serde(rename = "created_at")]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at")]
    pub updated_at: Option<String>,
}

impl From<OrderModel> for OrderResponse {
    fn from(value: OrderModel) -> Self {
        OrderResponse {
            id: value.order_id,
            merchant_id: value.merchant_id,
            user_id: value.user_id,
            total_price: value.total_price,
            created_at: value.created_at.map(|dt| dt.to_string()),
            updated_at: value.updated_at.map(|dt| dt.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct OrderResponseDeleteAt {
    pub id: i32,
    pub merchant_id: i32,
    pub user_id: i32,
    pub total_price: i64,
    #[serde(rename = "created_at")]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at")]
    pub updated_at: Option<String>,
    #[serde(rename = "deleted_at")]
    pub deleted_at: Option<String>,
}

impl From<OrderModel> for OrderResponseDeleteAt {
    fn from(value: OrderModel) -> Self {
        OrderResponseDeleteAt {
            id: value.order_id,
            merchant_id: value.merchant_id,
            user_id: value.user_id,
            total_price: value.total_price,
            created_at: value.created_at.map(|dt| dt.to_string()),
            updated_at: value.updated_at.map(|dt| dt.to_string()),
            deleted_at: value.deleted_at.map(|dt| dt.to_string()),
        }
    }
}
