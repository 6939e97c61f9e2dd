use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::Json;
use serde_json::{json, Value};
use utoipa_axum::{router::OpenApiRouter, routes};

/// Lists the service's endpoints with example requests
#[utoipa::path(
    get,
    path = "/",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service capabilities", body = Value)
    )
)]
async fn index() -> Json<Value> {
    Json(json!({
        "message": "EPA Facilities API Server",
        "endpoints": {
            "health": "/health",
            "ready": "/ready",
            "facilities": "GET /api/facilities (list all facilities with filtering & pagination)",
            "facilityById": "GET /api/facilities/:id",
            "openapi": "/openapi.json",
            "docs": "/scalar",
        },
        "examples": {
            "Get all facilities": "/api/facilities?limit=50",
            "Filter by state": "/api/facilities?state=CA&limit=50",
            "Filter by city and state": "/api/facilities?state=CA&city=Los%20Angeles&limit=50",
            "Filter by ZIP": "/api/facilities?zip=90210",
            "Get facility by ID": "/api/facilities/110000123456",
        },
    }))
}

pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(index))
}
