use crate::state::AppState;
use axum::{routing::get, Json, Router};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub(crate) const HEALTH_TAG: &str = "Health API";
pub(crate) const FACILITIES_TAG: &str = "Facilities API";

#[derive(OpenApi)]
#[openapi(
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = FACILITIES_TAG, description = "Facility search and lookup"),
    ),
    info(
        title = "EPA Facilities API",
        description = "Read-only search over environmental facility records",
        version = "1.0.0"
    )
)]
pub(crate) struct ApiDoc;

/// Creates a router serving the generated OpenAPI document and the Scalar UI
pub(crate) fn router(api_doc: utoipa::openapi::OpenApi) -> Router<AppState> {
    let document = api_doc.clone();
    Router::new()
        .route(
            "/openapi.json",
            get(move || {
                let document = document.clone();
                async move { Json(document) }
            }),
        )
        .merge(Scalar::with_url("/scalar", api_doc))
}
