use crate::model::product::Product as ProductModel;
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductCatalog = Arc<dyn ProductCatalogTrait + Send + Sync>;

#[async_trait]
pub trait ProductCatalogTrait {
    async fn find_by_id(&self, id: i32) -> Result<Option<ProductModel>, RepositoryError>;

    /// Takes `qty` units only if at least `qty` are in stock, as one atomic step.
    /// `None` means the product is missing or short.
    async fn decrease_stock(
        &self,
        product_id: i32,
        qty: i32,
    ) -> Result<Option<ProductModel>, RepositoryError>;

    async fn increase_stock(
        &self,
        product_id: i32,
        qty: i32,
    ) -> Result<ProductModel, RepositoryError>;
}
