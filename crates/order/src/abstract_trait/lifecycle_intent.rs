use crate::{domain::state::LifecycleAction, model::lifecycle_intent::LifecycleIntent};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::{sync::Arc, time::Duration};

pub type DynLifecycleIntentRepository = Arc<dyn LifecycleIntentRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait LifecycleIntentRepositoryTrait {
    async fn record_intent(
        &self,
        order_id: i32,
        action: LifecycleAction,
        lease: Duration,
    ) -> Result<LifecycleIntent, RepositoryError>;

    async fn complete_intent(&self, intent_id: i32) -> Result<(), RepositoryError>;

    /// Drops the lease so the next recovery pass may claim the intent.
    async fn release_intent(&self, intent_id: i32) -> Result<(), RepositoryError>;

    /// Leases every unfinished intent whose lease has lapsed, oldest first.
    async fn claim_pending(&self, lease: Duration) -> Result<Vec<LifecycleIntent>, RepositoryError>;
}
