pub mod get;
pub mod list;
pub mod models;

use crate::state::AppState;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Combines all facility routes into a single router
pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list::list_facilities))
        .routes(routes!(get::get_facility))
}
