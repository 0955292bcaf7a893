mod command;
mod policy;
mod query;
mod saga;

pub use self::command::{OrderCommandService, OrderCommandServiceDeps};
pub use self::policy::{ItemDeltaPolicy, OrderCommandConfig};
pub use self::query::OrderQueryService;
