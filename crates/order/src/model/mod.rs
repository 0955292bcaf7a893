pub mod lifecycle_intent;
pub mod merchant;
pub mod order;
pub mod order_item;
pub mod product;
pub mod shipping_address;
pub mod user;
