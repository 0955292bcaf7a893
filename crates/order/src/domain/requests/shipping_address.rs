use crate::model::shipping_address::ShippingAddress as ShippingAddressModel;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CreateShippingAddressRequest {
    #[validate(length(min = 1))]
    pub address: String,

    #[validate(length(min = 1))]
    pub province: String,

    #[validate(length(min = 1))]
    pub city: String,

    #[validate(length(min = 1))]
    pub country: String,

    #[validate(length(min = 1))]
    pub courier: String,

    #[validate(length(min = 1))]
    #[serde(rename = "shipping_method")]
    pub shipping_method: String,

    #[validate(range(min = 0))]
    #[serde(rename = "shipping_cost")]
    pub shipping_cost: i32,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct UpdateShippingAddressRequest {
    #[validate(range(min = 1))]
    #[serde(rename = "shipping_address_id", default)]
    pub shipping_address_id: Option<i32>,

    #[validate(nested)]
    #[serde(flatten)]
    pub details: CreateShippingAddressRequest,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateShippingAddressRecordRequest {
    pub order_id: i32,
    pub details: CreateShippingAddressRequest,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpdateShippingAddressRecordRequest {
    pub shipping_address_id: i32,
    pub order_id: i32,
    pub details: CreateShippingAddressRequest,
}

impl From<&ShippingAddressModel> for UpdateShippingAddressRecordRequest {
    fn from(value: &ShippingAddressModel) -> Self {
        UpdateShippingAddressRecordRequest {
            shipping_address_id: value.shipping_address_id,
            order_id: value.order_id,
            details: CreateShippingAddressRequest {
                address: value.address.clone(),
                province: value.province.clone(),
                city: value.city.clone(),
                country: value.country.clone(),
                courier: value.courier.clone(),
                shipping_method: value.shipping_method.clone(),
                shipping_cost: value.shipping_cost,
            },
        }
    }
}
