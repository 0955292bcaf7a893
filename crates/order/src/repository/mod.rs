mod directory;
mod lifecycle_intent;
mod order;
mod order_item;
mod product;
mod shipping_address;

pub use self::directory::{MerchantRepository, UserRepository};
pub use self::lifecycle_intent::LifecycleIntentRepository;
pub use self::order::{OrderCommandRepository, OrderQueryRepository};
pub use self::order_item::{OrderItemCommandRepository, OrderItemQueryRepository};
pub use self::product::ProductCatalogRepository;
pub use self::shipping_address::ShippingAddressRepository;
