use axum::response::{IntoResponse, Response};
use axum::Json;
use facility_store::StoreError;
use http::StatusCode;
use log::error;
use serde::Serialize;
use std::any::Any;
use utoipa::ToSchema;

/// Body of every failed response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Always false
    pub success: bool,
    /// What went wrong
    pub error: String,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub detail: String,
    pub status_code: StatusCode,
}

impl ApiError {
    /// Create a new ApiError with a detail message and status code
    pub fn new<S: ToString>(detail: S, status_code: StatusCode) -> Self {
        Self {
            detail: detail.to_string(),
            status_code,
        }
    }

    /// Create new Internal Server Error (500) with a detail message
    pub fn internal<S: ToString>(detail: S) -> Self {
        Self::new(detail, StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Create new Not Found (404) with a detail message
    pub fn not_found<S: ToString>(detail: S) -> Self {
        Self::new(detail, StatusCode::NOT_FOUND)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        if err.is_connectivity() {
            ApiError::internal(format!("Failed to connect to facility store: {}", err))
        } else {
            ApiError::internal(format!("Failed to query facility store: {}", err))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.detail,
        };
        (self.status_code, Json(body)).into_response()
    }
}

/// Renders a panic caught at the outermost layer.
///
/// Production deployments only see a generic message.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>, production: bool) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };
    error!("Request handler panicked: {}", message);

    if production {
        ApiError::internal("Internal server error").into_response()
    } else {
        ApiError::internal(message).into_response()
    }
}
