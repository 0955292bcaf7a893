use crate::errors::{
    error::ErrorResponse,
    service::{ErrorKind, ServiceError},
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(Debug)]
pub enum HttpError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    Conflict { code: String, message: String },
    ServiceUnavailable { code: String, message: String },
    GatewayTimeout { code: String, message: String },
    Internal { code: String, message: String },
}

impl HttpError {
    pub fn internal(message: impl Into<String>) -> Self {
        HttpError::Internal {
            code: "INTERNAL".into(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            HttpError::NotFound { .. } => StatusCode::NOT_FOUND,
            HttpError::Conflict { .. } => StatusCode::CONFLICT,
            HttpError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            HttpError::GatewayTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            HttpError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        let code = err.code().to_string();
        let message = err.to_string();

        match err.kind() {
            ErrorKind::ValidationFailed => HttpError::BadRequest { code, message },
            ErrorKind::NotFound => HttpError::NotFound { code, message },
            ErrorKind::ConflictFailed => HttpError::Conflict { code, message },
            ErrorKind::Cancelled => HttpError::ServiceUnavailable { code, message },
            ErrorKind::DeadlineExceeded => HttpError::GatewayTimeout { code, message },
            ErrorKind::OperationFailed => HttpError::Internal { code, message },
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (code, message) = match self {
            HttpError::BadRequest { code, message }
            | HttpError::NotFound { code, message }
            | HttpError::Conflict { code, message }
            | HttpError::ServiceUnavailable { code, message }
            | HttpError::GatewayTimeout { code, message }
            | HttpError::Internal { code, message } => (code, message),
        };

        let body = Json(ErrorResponse {
            status: "error".into(),
            code,
            message,
        });

        (status, body).into_response()
    }
}
