use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;
use reqwest::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::external::market_data::MarketDataError;

// Postgres SQLSTATE codes we surface as client-visible conflicts.
const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
// Class 22: value too long, numeric out of range and other bad input data.
const DATA_EXCEPTION_CLASS: &str = "22";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Db(sqlx::Error),
    #[error("Constraint violated: {0}")]
    Conflict(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("Insufficient holdings: {0}")]
    InsufficientHoldings(String),
    #[error("Rate limited by upstream market data API")]
    RateLimited,
    #[error("Upstream market data API timed out")]
    UpstreamTimeout,
    #[error("Upstream market data API unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("Malformed upstream payload: {0}")]
    UpstreamMalformed(String),
}

impl AppError {
    /// Stable machine-readable tag sent as the `error` field.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Db(_) => "internal",
            AppError::Conflict(_) => "conflict",
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::InsufficientFunds(_) => "insufficient_funds",
            AppError::InsufficientHoldings(_) => "insufficient_holdings",
            AppError::RateLimited => "rate_limited",
            AppError::UpstreamTimeout => "upstream_timeout",
            AppError::UpstreamUnavailable(_) => "upstream_unavailable",
            AppError::UpstreamMalformed(_) => "upstream_malformed",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InsufficientFunds(_) | AppError::InsufficientHoldings(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::UpstreamUnavailable(_) | AppError::UpstreamMalformed(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        // Database internals stay in the logs.
        let message = match &self {
            AppError::Db(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        let body = Json(json!({ "error": self.kind(), "message": message }));

        match self {
            AppError::RateLimited => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (status, headers, body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

/// Maps a Postgres error to the client-facing error it stands for, if any.
pub(crate) fn classify_db_error(code: Option<&str>, message: &str, constraint: Option<&str>) -> Option<AppError> {
    match code {
        Some(UNIQUE_VIOLATION | FOREIGN_KEY_VIOLATION | CHECK_VIOLATION) => Some(AppError::Conflict(format!(
            "{} ({})",
            message,
            constraint.unwrap_or("unknown constraint")
        ))),
        Some(c) if c.starts_with(DATA_EXCEPTION_CLASS) => Some(AppError::Validation(message.to_string())),
        _ => None,
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &value {
            let code = db_err.code();
            if let Some(err) = classify_db_error(code.as_deref(), db_err.message(), db_err.constraint()) {
                return err;
            }
        }
        AppError::Db(value)
    }
}

impl From<MarketDataError> for AppError {
    fn from(value: MarketDataError) -> Self {
        match value {
            MarketDataError::RateLimited => AppError::RateLimited,
            MarketDataError::Timeout => AppError::UpstreamTimeout,
            MarketDataError::Network(msg) => AppError::UpstreamUnavailable(msg),
            e @ MarketDataError::BadStatus(_) => AppError::UpstreamUnavailable(e.to_string()),
            e @ (MarketDataError::Parse(_) | MarketDataError::MissingField(_)) => {
                AppError::UpstreamMalformed(e.to_string())
            }
        }
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        AppError::Validation(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        AppError::Validation(value.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(value: PathRejection) -> Self {
        AppError::Validation(value.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(value: QueryRejection) -> Self {
        AppError::Validation(value.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_errors_are_distinguishable() {
        let unavailable = AppError::from(MarketDataError::BadStatus(503));
        let malformed = AppError::from(MarketDataError::MissingField("prices"));

        assert_eq!(unavailable.kind(), "upstream_unavailable");
        assert_eq!(unavailable.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(malformed.kind(), "upstream_malformed");
        assert_eq!(malformed.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_timeout_and_rate_limit_status() {
        assert_eq!(AppError::from(MarketDataError::Timeout).status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(AppError::from(MarketDataError::RateLimited).status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_rate_limited_response_has_retry_after() {
        let response = AppError::RateLimited.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("Retry-After").unwrap(), "60");
    }

    #[test]
    fn test_db_error_hides_details() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.kind(), "internal");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_constraint_violations_are_conflicts() {
        let err = classify_db_error(Some("23505"), "duplicate key", Some("accounts_username_key")).unwrap();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert!(err.to_string().contains("accounts_username_key"));
        assert!(matches!(classify_db_error(Some("23503"), "fk", None), Some(AppError::Conflict(_))));
    }

    #[test]
    fn test_data_exceptions_are_validation_errors() {
        // 22001 value too long, 22003 numeric field overflow
        let too_long = classify_db_error(Some("22001"), "value too long for type character varying(255)", None).unwrap();
        let overflow = classify_db_error(Some("22003"), "numeric field overflow", None).unwrap();

        assert_eq!(too_long.kind(), "validation");
        assert_eq!(too_long.status(), StatusCode::BAD_REQUEST);
        assert_eq!(overflow.kind(), "validation");
    }

    #[test]
    fn test_other_database_errors_stay_internal() {
        assert!(classify_db_error(Some("40001"), "serialization failure", None).is_none());
        assert!(classify_db_error(None, "connection reset", None).is_none());
    }
}
