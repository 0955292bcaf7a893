use crate::{
    abstract_trait::order::repository::OrderQueryRepositoryTrait,
    domain::requests::order::FindAllOrder, model::order::Order as OrderModel,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use sqlx::FromRow;
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderQueryRepository {
    db: ConnectionPool,
}

#[derive(FromRow)]
struct OrderRow {
    #[sqlx(flatten)]
    order: OrderModel,
    total_count: i64,
}

#[derive(Clone, Copy, Debug)]
enum Visibility {
    Active,
    Trashed,
}

impl Visibility {
    fn predicate(self) -> &'static str {
        match self {
            Visibility::Active => "o.deleted_at IS NULL",
            Visibility::Trashed => "o.deleted_at IS NOT NULL",
        }
    }
}

impl OrderQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }

    async fn find_page(
        &self,
        req: &FindAllOrder,
        visibility: Visibility,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        info!(
            "🔍 Fetching {:?} orders with search: {:?}",
            visibility, req.search
        );

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let limit = req.page_size as i64;
        let offset = ((req.page - 1).max(0) * req.page_size) as i64;

        let search_pattern = if req.search.trim().is_empty() {
            None
        } else {
            Some(req.search.trim().to_string())
        };

        let sql = format!(
            r#"
            SELECT
                o.order_id,
                o.merchant_id,
                o.user_id,
                o.total_price,
                o.created_at,
                o.updated_at,
                o.deleted_at,
                COUNT(*) OVER() AS total_count
            FROM orders o
            WHERE {}
              AND ($1::TEXT IS NULL
                   OR o.order_id::TEXT ILIKE '%' || $1 || '%'
                   OR o.user_id::TEXT ILIKE '%' || $1 || '%')
            ORDER BY o.created_at DESC, o.order_id DESC
            LIMIT $2 OFFSET $3
            "#,
            visibility.predicate()
        );

        let rows = sqlx::query_as::<_, OrderRow>(&sql)
            .bind(search_pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch {:?} orders: {:?}", visibility, e);
                RepositoryError::from(e)
            })?;

        let total = rows.first().map(|r| r.total_count).unwrap_or(0);
        let orders = rows.into_iter().map(|r| r.order).collect();

        Ok((orders, total))
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for OrderQueryRepository {
    async fn find_active(
        &self,
        req: &FindAllOrder,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        self.find_page(req, Visibility::Active).await
    }

    async fn find_trashed(
        &self,
        req: &FindAllOrder,
    ) -> Result<(Vec<OrderModel>, i64), RepositoryError> {
        self.find_page(req, Visibility::Trashed).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<OrderModel>, RepositoryError> {
        info!("🆔 Fetching order by ID: {}", id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let order = sqlx::query_as::<_, OrderModel>(
            r#"
            SELECT order_id, merchant_id, user_id, total_price, created_at, updated_at, deleted_at
            FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch order {}: {:?}", id, e);
            RepositoryError::from(e)
        })?;

        Ok(order)
    }
}
