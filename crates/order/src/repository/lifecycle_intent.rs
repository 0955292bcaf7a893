use crate::{
    abstract_trait::lifecycle_intent::LifecycleIntentRepositoryTrait,
    domain::state::LifecycleAction, model::lifecycle_intent::LifecycleIntent,
};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::FromRow;
use std::time::Duration;
use tracing::{error, info};

#[derive(FromRow)]
struct IntentRow {
    intent_id: i32,
    order_id: i32,
    action: String,
    created_at: Option<NaiveDateTime>,
    leased_until: Option<NaiveDateTime>,
    completed_at: Option<NaiveDateTime>,
}

impl TryFrom<IntentRow> for LifecycleIntent {
    type Error = RepositoryError;

    fn try_from(row: IntentRow) -> Result<Self, Self::Error> {
        let action = LifecycleAction::try_from(row.action.as_str())
            .map_err(RepositoryError::Custom)?;

        Ok(LifecycleIntent {
            intent_id: row.intent_id,
            order_id: row.order_id,
            action,
            created_at: row.created_at,
            leased_until: row.leased_until,
            completed_at: row.completed_at,
        })
    }
}

#[derive(Clone)]
pub struct LifecycleIntentRepository {
    db: ConnectionPool,
}

impl LifecycleIntentRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl LifecycleIntentRepositoryTrait for LifecycleIntentRepository {
    async fn record_intent(
        &self,
        order_id: i32,
        action: LifecycleAction,
        lease: Duration,
    ) -> Result<LifecycleIntent, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let row = sqlx::query_as::<_, IntentRow>(
            r#"
            INSERT INTO order_lifecycle_intents (order_id, action, created_at, leased_until)
            VALUES ($1, $2, current_timestamp, current_timestamp + make_interval(secs => $3))
            RETURNING intent_id, order_id, action, created_at, leased_until, completed_at
            "#,
        )
        .bind(order_id)
        .bind(action.as_str())
        .bind(lease.as_secs_f64())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!(
                "❌ Failed to record {} intent for order {}: {:?}",
                action, order_id, e
            );
            RepositoryError::from(e)
        })?;

        info!(
            "📝 Recorded {} intent {} for order {}",
            action, row.intent_id, order_id
        );
        row.try_into()
    }

    async fn complete_intent(&self, intent_id: i32) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query(
            r#"
            UPDATE order_lifecycle_intents
            SET completed_at = COALESCE(completed_at, current_timestamp)
            WHERE intent_id = $1
            "#,
        )
        .bind(intent_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to complete intent {}: {:?}", intent_id, e);
            RepositoryError::from(e)
        })?;

        Ok(())
    }

    async fn release_intent(&self, intent_id: i32) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query(
            r#"
            UPDATE order_lifecycle_intents
            SET leased_until = NULL
            WHERE intent_id = $1 AND completed_at IS NULL
            "#,
        )
        .bind(intent_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to release intent {}: {:?}", intent_id, e);
            RepositoryError::from(e)
        })?;

        Ok(())
    }

    async fn claim_pending(&self, lease: Duration) -> Result<Vec<LifecycleIntent>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let mut rows = sqlx::query_as::<_, IntentRow>(
            r#"
            UPDATE order_lifecycle_intents
            SET leased_until = current_timestamp + make_interval(secs => $1)
            WHERE intent_id IN (
                SELECT intent_id
                FROM order_lifecycle_intents
                WHERE completed_at IS NULL
                  AND (leased_until IS NULL OR leased_until < current_timestamp)
                ORDER BY intent_id
                FOR UPDATE SKIP LOCKED
            )
            RETURNING intent_id, order_id, action, created_at, leased_until, completed_at
            "#,
        )
        .bind(lease.as_secs_f64())
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to claim pending lifecycle intents: {:?}", e);
            RepositoryError::from(e)
        })?;

        rows.sort_by_key(|row| row.intent_id);

        if !rows.is_empty() {
            info!("📋 Claimed {} pending lifecycle intents", rows.len());
        }

        rows.into_iter().map(LifecycleIntent::try_from).collect()
    }
}
