pub(crate) mod facilities;
pub(crate) mod health;
pub(crate) mod index;

use crate::errors::ApiError;
use crate::state::AppState;
use axum::response::{IntoResponse, Response};
use utoipa_axum::router::OpenApiRouter;

/// Combines all API routes into a single router
pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(index::router())
        .merge(health::router())
        .merge(facilities::router())
}

/// Handler for requests that match no route
pub(super) async fn not_found() -> Response {
    ApiError::not_found("Route not found").into_response()
}
