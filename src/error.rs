use axum::{
    response::{IntoResponse, Response},
    Json,
    http::StatusCode,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unprocessable(String),

    /// Keeps the full cause chain (and a backtrace when `RUST_BACKTRACE`
    /// is set) for the error log; clients only see the flattened message.
    #[error("Internal server error: {0:#}")]
    Internal(#[source] anyhow::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            detail: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(anyhow::Error::new(err).context("malformed extraction output"))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(anyhow::Error::new(err).context("extraction task failed"))
    }
}

/// Failure of a single fetch attempt. Never shown to clients; it only
/// decides whether the fallback fetcher runs.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("body size {0} bytes outside accepted range")]
    BodySize(usize),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn json_failure() -> AppError {
        serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into()
    }

    #[test]
    fn status_codes_follow_variant() {
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Unprocessable("x".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("x")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_is_prefixed() {
        let err = AppError::Internal(anyhow::anyhow!("boom"));
        assert_eq!(err.to_string(), "Internal server error: boom");
    }

    #[test]
    fn json_error_detail_includes_cause() {
        let err = json_failure();
        assert!(matches!(err, AppError::Internal(_)));
        assert!(err
            .to_string()
            .starts_with("Internal server error: malformed extraction output: EOF"));
    }

    #[test]
    fn internal_error_keeps_its_cause_chain() {
        let err = json_failure();

        let source = err.source().expect("internal errors expose their source");
        assert_eq!(source.to_string(), "malformed extraction output");
        assert!(source.source().is_some_and(|cause| cause.is::<serde_json::Error>()));

        let AppError::Internal(inner) = &err else { unreachable!() };
        assert!(format!("{inner:?}").contains("Caused by"));
    }
}
