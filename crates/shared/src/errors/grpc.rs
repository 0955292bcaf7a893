use crate::errors::service::{ErrorKind, ServiceError};
use tonic::{Code, Status};

impl From<ServiceError> for Status {
    fn from(err: ServiceError) -> Self {
        let code = match err.kind() {
            ErrorKind::NotFound => Code::NotFound,
            ErrorKind::ValidationFailed => Code::InvalidArgument,
            ErrorKind::ConflictFailed => Code::FailedPrecondition,
            ErrorKind::OperationFailed => Code::Internal,
            ErrorKind::Cancelled => Code::Cancelled,
            ErrorKind::DeadlineExceeded => Code::DeadlineExceeded,
        };

        Status::new(code, format!("{}: {err}", err.code()))
    }
}
