use facility_store::{Facility, FacilityFilters};
use serde::Serialize;
use utoipa::ToSchema;

/// Page of facilities returned by the listing endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct FacilityListResponse {
    pub success: bool,
    /// Facility records, newest first
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Facility>,
    pub pagination: PaginationInfo,
    /// The filters applied, or null when none were given
    #[schema(value_type = Option<Object>)]
    pub filters: Option<FacilityFilters>,
}

/// Paging state of a listing response
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    /// Effective page size after clamping
    pub limit: u64,
    /// Number of records in this page
    pub count: usize,
    /// Total matching records; only computed for the first unfiltered page
    pub total: Option<u64>,
    pub has_more: bool,
    /// Token for the next page, null on the last page
    pub next_token: Option<String>,
}

/// Single facility returned by the lookup endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct FacilityResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: Facility,
}
