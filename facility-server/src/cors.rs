use crate::config::FacilitiesConfig;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, Method};
use log::warn;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Builds the CORS layer from the configured origin list.
///
/// A `*` anywhere in the list allows every origin. Origins that are not
/// valid header values are skipped with a warning.
pub(crate) fn cors_layer(config: &FacilitiesConfig) -> CorsLayer {
    let origins = config.get_allowed_origins();

    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::from(Any)
    } else {
        let values: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin '{}'", origin);
                    None
                }
            })
            .collect();
        AllowOrigin::list(values)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}
