use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::errors::ArancelError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    ServiceUnavailable(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}

#[derive(Serialize)]
struct ErrBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, msg) = match &self {
            AppError::BadRequest(s) => (StatusCode::BAD_REQUEST, s),
            AppError::ServiceUnavailable(s) => (StatusCode::SERVICE_UNAVAILABLE, s),
            AppError::Internal(s) => (StatusCode::INTERNAL_SERVER_ERROR, s),
        };
        (code, Json(ErrBody { error: msg.clone() })).into_response()
    }
}

impl From<ArancelError> for AppError {
    fn from(err: ArancelError) -> Self {
        match err {
            ArancelError::Validation { field, message } => {
                AppError::BadRequest(format!("Validation error for {field}: {message}"))
            }
            ArancelError::Serialization { context, source } => {
                AppError::BadRequest(format!("Serialization {context} failed: {source}"))
            }
            ArancelError::Config { message } | ArancelError::Schema { message } => {
                AppError::ServiceUnavailable(message)
            }
            ArancelError::Artifact { artifact, message } => {
                AppError::ServiceUnavailable(format!("Artifact {artifact}: {message}"))
            }
            ArancelError::Inference { message } => {
                AppError::Internal(format!("Inference failed: {message}"))
            }
            ArancelError::Io { operation, source } => {
                AppError::Internal(format!("I/O {operation} failed: {source}"))
            }
            ArancelError::Internal { message } => AppError::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_errors_to_status() {
        let resp = AppError::from(ArancelError::validation("terreno", "nan")).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = AppError::from(ArancelError::inference("tract failed")).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = AppError::from(ArancelError::schema("empty")).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let resp = AppError::bad_request("bad body").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
