use crate::api::facilities::models::{FacilityListResponse, PaginationInfo};
use crate::errors::{ApiError, ErrorBody};
use crate::openapi::FACILITIES_TAG;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use facility_store::{
    build_predicate, decode_token, encode_token, FacilityFilters, FacilityStore, StoreError,
};
use http::StatusCode;
use log::{debug, error};

pub const DEFAULT_LIMIT: u64 = 50;
pub const MAX_LIMIT: u64 = 500;

/// A parsed listing request
#[derive(Debug, Clone, PartialEq)]
pub struct ListRequest {
    pub filters: FacilityFilters,
    /// Page size, already clamped
    pub limit: u64,
    /// Records to skip, from the continuation token
    pub offset: u64,
}

impl ListRequest {
    /// Parses raw query pairs. Nothing here can fail: bad values fall back
    /// to defaults and unknown parameters are ignored.
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let first = |name: &str| {
            pairs
                .iter()
                .find(|(key, value)| key == name && !value.trim().is_empty())
                .map(|(_, value)| value.as_str())
        };

        Self {
            filters: FacilityFilters::from_pairs(
                pairs.iter().map(|(key, value)| (key.as_str(), value.as_str())),
            ),
            limit: parse_limit(first("limit")),
            offset: first("nextToken").and_then(decode_token).unwrap_or(0),
        }
    }
}

/// Parses the requested page size.
///
/// Only the leading digits count, so `12abc` is 12. Missing, non-numeric
/// and zero values give the default. Negative values clamp to 1 and anything
/// above the maximum (even beyond `u64`) clamps to the maximum.
pub fn parse_limit(raw: Option<&str>) -> u64 {
    let Some(raw) = raw.map(str::trim) else {
        return DEFAULT_LIMIT;
    };
    let (negative, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let digits = &unsigned[..end];
    if digits.is_empty() {
        return DEFAULT_LIMIT;
    }
    if digits.bytes().all(|b| b == b'0') {
        return DEFAULT_LIMIT;
    }
    if negative {
        return 1;
    }
    digits.parse::<u64>().map_or(MAX_LIMIT, |n| n.min(MAX_LIMIT))
}

/// Fetches one page of facilities.
///
/// One record beyond the page size is requested to learn whether another
/// page exists. The total is only counted for the first page of an
/// unfiltered listing.
pub async fn list_page(
    store: &dyn FacilityStore,
    request: &ListRequest,
) -> Result<FacilityListResponse, StoreError> {
    let predicate = build_predicate(&request.filters);
    debug!(
        "Listing facilities: filters={:?} offset={} limit={}",
        request.filters, request.offset, request.limit
    );

    let mut data = store
        .find_page(&predicate, request.offset, request.limit + 1)
        .await?;
    let has_more = data.len() as u64 > request.limit;
    data.truncate(request.limit as usize);

    let total = if request.offset == 0 && request.filters.is_empty() {
        Some(store.count(&predicate).await?)
    } else {
        None
    };

    let next_token = has_more.then(|| encode_token(request.offset + request.limit));

    Ok(FacilityListResponse {
        success: true,
        pagination: PaginationInfo {
            limit: request.limit,
            count: data.len(),
            total,
            has_more,
            next_token,
        },
        data,
        filters: (!request.filters.is_empty()).then(|| request.filters.clone()),
    })
}

#[utoipa::path(
    get,
    path = "/api/facilities",
    tag = FACILITIES_TAG,
    params(
        ("state" = Option<String>, Query, description = "State, e.g. CA (case-insensitive)"),
        ("city" = Option<String>, Query, description = "City name fragment"),
        ("zip" = Option<String>, Query, description = "Exact ZIP code"),
        ("sic" = Option<String>, Query, description = "SIC code fragment"),
        ("naics" = Option<String>, Query, description = "NAICS code fragment"),
        ("frsId" = Option<String>, Query, description = "FRS identifier fragment"),
        ("name" = Option<String>, Query, description = "Facility name fragment"),
        ("type" = Option<String>, Query, description = "Source program, e.g. cwa, air, rcra"),
        ("limit" = Option<u64>, Query, description = "Page size (default 50, max 500)"),
        ("nextToken" = Option<String>, Query, description = "Token from the previous page"),
    ),
    responses(
        (status = 200, description = "Page of facilities", body = FacilityListResponse),
        (status = 500, description = "Facility store unavailable", body = ErrorBody)
    )
)]
pub(crate) async fn list_facilities(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let request = ListRequest::from_pairs(&params);
    match list_page(state.store.as_ref(), &request).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(err) => {
            error!("Failed to list facilities: {}", err);
            ApiError::from(err).into_response()
        }
    }
}
