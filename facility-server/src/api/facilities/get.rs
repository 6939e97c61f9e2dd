use crate::api::facilities::models::FacilityResponse;
use crate::errors::{ApiError, ErrorBody};
use crate::openapi::FACILITIES_TAG;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use facility_store::Predicate;
use http::StatusCode;
use log::{debug, error};

/// Fetch a single facility by FRS identifier or name
///
/// The identifier matches the FRS ID exactly or any part of the facility
/// name, case-insensitively. When several records match, the first in
/// storage order is returned.
#[utoipa::path(
    get,
    path = "/api/facilities/{id}",
    tag = FACILITIES_TAG,
    params(
        ("id" = String, Path, description = "FRS identifier or facility name fragment")
    ),
    responses(
        (status = 200, description = "Facility found", body = FacilityResponse),
        (status = 404, description = "No facility matches the identifier", body = ErrorBody),
        (status = 500, description = "Facility store unavailable", body = ErrorBody)
    )
)]
pub(crate) async fn get_facility(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    debug!("Looking up facility '{}'", id);
    match state.store.find_first(&Predicate::by_identifier(&id)).await {
        Ok(Some(facility)) => (
            StatusCode::OK,
            Json(FacilityResponse {
                success: true,
                data: facility,
            }),
        )
            .into_response(),
        Ok(None) => ApiError::not_found("Facility not found").into_response(),
        Err(err) => {
            error!("Failed to fetch facility '{}': {}", id, err);
            ApiError::from(err).into_response()
        }
    }
}
