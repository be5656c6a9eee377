use axum::{http::StatusCode, response::Json};
use serde_json::json;
use tracing::{error, warn};

use crate::service::ServiceError;
use crate::validation::FieldError;

pub const VALIDATION_ERRORS: &str = "validation errors";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),
    /// Carries the individual problems for logging; the response body only
    /// ever says `validation errors`.
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::RestaurantNotFound => ApiError::NotFound("Restaurant not found"),
            ServiceError::Validation(errors) => ApiError::Validation(errors),
            ServiceError::Database(e) => ApiError::InternalError(format!("Database error: {e}")),
            ServiceError::Pool(e) => ApiError::InternalError(format!("Connection pool error: {e}")),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Validation(errors) => {
                warn!(?errors, "Responding with validation errors");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "errors": [VALIDATION_ERRORS] })),
                )
                    .into_response()
            }
            ApiError::InternalError(message) => {
                error!("{message}");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::to_bytes, response::IntoResponse};

    use super::*;

    #[tokio::test]
    async fn test_internal_error_has_empty_body() {
        let response = ApiError::from(ServiceError::Database(diesel::result::Error::NotFound))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = ApiError::from(ServiceError::RestaurantNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            serde_json::from_slice::<serde_json::Value>(&body).unwrap(),
            json!({"error": "Restaurant not found"})
        );
    }
}
