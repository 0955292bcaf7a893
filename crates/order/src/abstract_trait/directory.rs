use crate::model::{merchant::Merchant as MerchantModel, user::User as UserModel};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynMerchantRepository = Arc<dyn MerchantRepositoryTrait + Send + Sync>;
pub type DynUserRepository = Arc<dyn UserRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait MerchantRepositoryTrait {
    async fn find_by_id(&self, id: i32) -> Result<Option<MerchantModel>, RepositoryError>;
}

#[async_trait]
pub trait UserRepositoryTrait {
    async fn find_by_id(&self, id: i32) -> Result<Option<UserModel>, RepositoryError>;
}
