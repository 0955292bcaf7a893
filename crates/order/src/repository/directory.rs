use crate::{
    abstract_trait::directory::{MerchantRepositoryTrait, UserRepositoryTrait},
    model::{merchant::Merchant as MerchantModel, user::User as UserModel},
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::error;

#[derive(Clone)]
pub struct MerchantRepository {
    db: ConnectionPool,
}

impl MerchantRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MerchantRepositoryTrait for MerchantRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<MerchantModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, MerchantModel>(
            "SELECT merchant_id, name FROM merchants WHERE merchant_id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch merchant {}: {:?}", id, e);
            RepositoryError::from(e)
        })
    }
}

#[derive(Clone)]
pub struct UserRepository {
    db: ConnectionPool,
}

impl UserRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<UserModel>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, UserModel>("SELECT user_id, email FROM users WHERE user_id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch user {}: {:?}", id, e);
                RepositoryError::from(e)
            })
    }
}
