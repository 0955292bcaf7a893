use crate::{
    errors::{operation::Operation, repository::RepositoryError},
    utils::ContextError,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Machine-readable category of a [`ServiceError`]; adapters map it to transport codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotFound,
    ValidationFailed,
    ConflictFailed,
    OperationFailed,
    Cancelled,
    DeadlineExceeded,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::ValidationFailed => "VALIDATION_FAILED",
            ErrorKind::ConflictFailed => "CONFLICT_FAILED",
            ErrorKind::OperationFailed => "OPERATION_FAILED",
            ErrorKind::Cancelled => "CANCELLED",
            ErrorKind::DeadlineExceeded => "DEADLINE_EXCEEDED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("Merchant {0} not found")]
    MerchantNotFound(i32),

    #[error("User {0} not found")]
    UserNotFound(i32),

    #[error("Product {0} not found")]
    ProductNotFound(i32),

    #[error("Order {0} not found")]
    OrderNotFound(i32),

    #[error("Order item {0} not found")]
    OrderItemNotFound(i32),

    #[error("Shipping address {0} not found")]
    ShippingAddressNotFound(i32),

    #[error(
        "Insufficient stock for product {product_id}: requested={requested}, available={available}"
    )]
    InsufficientStock {
        product_id: i32,
        requested: i32,
        available: i32,
    },

    #[error("Order {0} is already trashed")]
    OrderAlreadyTrashed(i32),

    #[error("Order {0} is not trashed")]
    OrderNotTrashed(i32),

    #[error("Order item {order_item_id} of order {order_id} is already trashed")]
    OrderItemAlreadyTrashed { order_id: i32, order_item_id: i32 },

    #[error("Failed to {operation}: {source}")]
    OperationFailed {
        operation: Operation,
        #[source]
        source: RepositoryError,
    },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,
}

impl ServiceError {
    pub fn operation(operation: Operation) -> impl FnOnce(RepositoryError) -> ServiceError {
        move |source| ServiceError::OperationFailed { operation, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::MerchantNotFound(_)
            | ServiceError::UserNotFound(_)
            | ServiceError::ProductNotFound(_)
            | ServiceError::OrderNotFound(_)
            | ServiceError::OrderItemNotFound(_)
            | ServiceError::ShippingAddressNotFound(_) => ErrorKind::NotFound,
            ServiceError::Validation(_) | ServiceError::InsufficientStock { .. } => {
                ErrorKind::ValidationFailed
            }
            ServiceError::OrderAlreadyTrashed(_)
            | ServiceError::OrderNotTrashed(_)
            | ServiceError::OrderItemAlreadyTrashed { .. } => ErrorKind::ConflictFailed,
            ServiceError::OperationFailed { .. } => ErrorKind::OperationFailed,
            ServiceError::Cancelled => ErrorKind::Cancelled,
            ServiceError::DeadlineExceeded => ErrorKind::DeadlineExceeded,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "VALIDATION_FAILED",
            ServiceError::MerchantNotFound(_) => "MERCHANT_NOT_FOUND",
            ServiceError::UserNotFound(_) => "USER_NOT_FOUND",
            ServiceError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            ServiceError::OrderNotFound(_) => "ORDER_NOT_FOUND",
            ServiceError::OrderItemNotFound(_) => "ORDER_ITEM_NOT_FOUND",
            ServiceError::ShippingAddressNotFound(_) => "SHIPPING_ADDRESS_NOT_FOUND",
            ServiceError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            ServiceError::OrderAlreadyTrashed(_) => "ORDER_ALREADY_TRASHED",
            ServiceError::OrderNotTrashed(_) => "ORDER_NOT_TRASHED",
            ServiceError::OrderItemAlreadyTrashed { .. } => "ORDER_ITEM_ALREADY_TRASHED",
            ServiceError::OperationFailed { operation, .. } => operation.code(),
            ServiceError::Cancelled => "CANCELLED",
            ServiceError::DeadlineExceeded => "DEADLINE_EXCEEDED",
        }
    }
}

impl From<ContextError> for ServiceError {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Cancelled => ServiceError::Cancelled,
            ContextError::DeadlineExceeded => ServiceError::DeadlineExceeded,
        }
    }
}
