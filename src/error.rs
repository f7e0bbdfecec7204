use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures turning input into ledger events.
///
/// Each one is fatal for the computation that hit it; no partial snapshot is
/// produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid event kind: {0:?} (expected \"advance\" or \"payment\")")]
    InvalidEventKind(String),
    #[error("malformed date: {0:?} (expected YYYY-MM-DD)")]
    MalformedDate(String),
    #[error("malformed amount: {0:?}")]
    MalformedAmount(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<crate::orchestration::ReplayError> for AppError {
    fn from(err: crate::orchestration::ReplayError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_messages() {
        assert_eq!(
            LedgerError::InvalidEventKind("refund".into()).to_string(),
            "invalid event kind: \"refund\" (expected \"advance\" or \"payment\")"
        );
        assert_eq!(
            LedgerError::MalformedDate("2021-13-01".into()).to_string(),
            "malformed date: \"2021-13-01\" (expected YYYY-MM-DD)"
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        let resp = AppError::BadRequest("nope".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let resp = AppError::Internal("boom".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
