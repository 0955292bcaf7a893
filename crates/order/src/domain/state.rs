use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shared::errors::ServiceError;
use std::fmt;

/// Lifecycle position of an order aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderState {
    Active,
    Trashed,
    Purged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleAction {
    Trash,
    Restore,
    Purge,
}

impl OrderState {
    pub fn from_deleted_at(deleted_at: Option<NaiveDateTime>) -> Self {
        match deleted_at {
            Some(_) => OrderState::Trashed,
            None => OrderState::Active,
        }
    }

    /// Applies `action`, or returns the conflict that forbids it.
    pub fn apply(self, action: LifecycleAction, order_id: i32) -> Result<Self, ServiceError> {
        match (self, action) {
            (OrderState::Purged, _) => Err(ServiceError::OrderNotFound(order_id)),
            (OrderState::Active, LifecycleAction::Trash) => Ok(OrderState::Trashed),
            (OrderState::Trashed, LifecycleAction::Trash) => {
                Err(ServiceError::OrderAlreadyTrashed(order_id))
            }
            (OrderState::Trashed, LifecycleAction::Restore) => Ok(OrderState::Active),
            (OrderState::Trashed, LifecycleAction::Purge) => Ok(OrderState::Purged),
            (OrderState::Active, LifecycleAction::Restore | LifecycleAction::Purge) => {
                Err(ServiceError::OrderNotTrashed(order_id))
            }
        }
    }
}

impl LifecycleAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleAction::Trash => "trash",
            LifecycleAction::Restore => "restore",
            LifecycleAction::Purge => "purge",
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for LifecycleAction {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "trash" => Ok(LifecycleAction::Trash),
            "restore" => Ok(LifecycleAction::Restore),
            "purge" => Ok(LifecycleAction::Purge),
            other => Err(format!("unknown lifecycle action '{other}'")),
        }
    }
}
