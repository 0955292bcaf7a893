use crate::state::AppState;
use axum::{
    extract::State,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use prometheus_client::{encoding::text::encode, registry::Registry};
use shared::errors::HttpError;
use std::sync::Arc;

pub fn render_metrics(registry: &Registry) -> Result<String, HttpError> {
    let mut buffer = String::new();
    encode(&mut buffer, registry)
        .map_err(|e| HttpError::internal(format!("Failed to encode metrics: {e}")))?;
    Ok(buffer)
}

pub async fn metrics_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpError> {
    let buffer = render_metrics(&state.registry)?;

    Ok((
        StatusCode::OK,
        [(
            CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        buffer,
    )
        .into_response())
}
