use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid feature: {0}")]
    InvalidFeature(String),

    #[error("Invalid coefficient: {0}")]
    InvalidCoefficient(String),

    #[error("Coefficient store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    /// Short label used in logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidFeature(_) => "invalid_feature",
            AppError::InvalidCoefficient(_) => "invalid_coefficient",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::Unexpected(_) => "unexpected",
        }
    }

    /// Validation failures are a property of the request, everything else is ours.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidFeature(_) | AppError::InvalidCoefficient(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        metrics::counter!("ctr_failures_total", "kind" => self.kind()).increment(1);

        if self.is_client_error() {
            // No body: the message would leak the coefficient key layout.
            tracing::warn!(kind = self.kind(), "CTR could not be predicted: {}", self);
            return status.into_response();
        }

        tracing::error!(kind = self.kind(), "CTR could not be predicted: {}", self);
        let body = Json(json!({
            "error": "Internal server error",
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::StoreUnavailable(err.to_string())
    }
}

// Helper function for creating feature validation errors
pub fn feature_error(msg: &str) -> AppError {
    AppError::InvalidFeature(msg.to_string())
}

// Helper function for creating coefficient validation errors
pub fn coefficient_error(msg: &str) -> AppError {
    AppError::InvalidCoefficient(msg.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_kinds_map_to_bad_request() {
        assert_eq!(feature_error("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(coefficient_error("x").status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn infrastructure_kinds_map_to_server_error() {
        let unavailable = AppError::StoreUnavailable("connection refused".to_string());
        let unexpected = AppError::Unexpected("boom".to_string());
        assert_eq!(unavailable.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(unexpected.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!unavailable.is_client_error());
    }

    #[test]
    fn redis_errors_become_store_unavailable() {
        let err: AppError =
            redis::RedisError::from((redis::ErrorKind::IoError, "connection refused")).into();
        assert_eq!(err.kind(), "store_unavailable");
    }

    #[test]
    fn client_error_response_has_no_body() {
        let response = coefficient_error("deviceExtBrowser=Firefox").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get("content-type").is_none());
    }
}
