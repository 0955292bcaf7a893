mod error;
mod grpc;
mod http;
mod operation;
mod repository;
mod service;

pub use self::error::ErrorResponse;
pub use self::http::HttpError;
pub use self::operation::Operation;
pub use self::repository::RepositoryError;
pub use self::service::{ErrorKind, ServiceError};
