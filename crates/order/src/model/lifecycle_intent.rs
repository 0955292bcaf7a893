use crate::domain::state::LifecycleAction;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A cascade that was started but not yet confirmed finished.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleIntent {
    pub intent_id: i32,
    pub order_id: i32,
    pub action: LifecycleAction,
    pub created_at: Option<NaiveDateTime>,
    /// Until this instant the intent belongs to whoever recorded or claimed it.
    pub leased_until: Option<NaiveDateTime>,
    pub completed_at: Option<NaiveDateTime>,
}
