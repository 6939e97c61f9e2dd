mod api;
mod config;
mod cors;
mod errors;
mod openapi;
mod state;
#[cfg(test)]
mod test_utils;

use crate::config::FacilitiesConfig;
use crate::state::AppState;
use axum::Router;
use facility_store::redact_credentials;
use log::{error, info, warn};
use std::any::Any;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Load configuration
    let config = match FacilitiesConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!("Environment: {}", config.environment);
    match config.mongodb.uri.as_deref() {
        Some(uri) => info!(
            "Facility store: {} (database: {}, collection: {})",
            redact_credentials(uri),
            config.mongodb.database,
            config.mongodb.collection
        ),
        None => warn!(
            "FACILITIES_MONGODB_URI is not set, facility requests will fail until it is configured"
        ),
    }

    // The store connects lazily on the first request
    let state = AppState::new(config.clone());
    let app = create_app(state);

    // Build server address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    // Start server
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server running on {}, press Ctrl+C to stop", addr);
    info!("API docs available at http://localhost:{}/scalar", config.port);
    let serve = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    if let Err(e) = serve {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Create a new application instance with a given state
pub fn create_app(state: AppState) -> Router {
    // Collect the documented routes and their OpenAPI document
    let (api_router, api_doc) = OpenApiRouter::with_openapi(openapi::ApiDoc::openapi())
        .merge(api::router())
        .split_for_parts();

    let router = api_router
        .merge(openapi::router(api_doc))
        .fallback(api::not_found);

    with_middleware(router, &state.config).with_state(state)
}

/// Wraps a router in the panic boundary and the CORS layer
fn with_middleware(router: Router<AppState>, config: &FacilitiesConfig) -> Router<AppState> {
    let production = config.is_production();
    router
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| errors::panic_response(panic, production),
        ))
        .layer(cors::cors_layer(config))
}

// Simple signal handler that works on all platforms
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestFixture;
    use axum::body::Body;
    use axum::routing::get;
    use facility_store::InMemoryFacilityStore;
    use http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn boom() -> &'static str {
        panic!("index out of bounds in test handler")
    }

    async fn call_panicking_route(environment: &str) -> (StatusCode, Value) {
        let config = FacilitiesConfig {
            environment: environment.to_string(),
            ..Default::default()
        };
        let state = AppState::with_store(
            config.clone(),
            Arc::new(InMemoryFacilityStore::default()),
        );
        let app = with_middleware(Router::new().route("/boom", get(boom)), &config)
            .with_state(state);

        let response = app
            .oneshot(Request::get("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_panic_detail_in_development() {
        let (status, body) = call_panicking_route("development").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "success": false, "error": "index out of bounds in test handler" })
        );
    }

    #[tokio::test]
    async fn test_panic_hidden_in_production() {
        let (status, body) = call_panicking_route("production").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "success": false, "error": "Internal server error" })
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let fixture = TestFixture::new(vec![]);
        let response = fixture.get("/api/unknown").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(
            response.json,
            json!({ "success": false, "error": "Route not found" })
        );
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let fixture = TestFixture::new(vec![]);
        let response = fixture.get("/openapi.json").await;

        response.assert_ok();
        assert_eq!(response.json["info"]["title"], "EPA Facilities API");
        let paths = response.json["paths"].as_object().unwrap();
        for path in ["/", "/health", "/ready", "/api/facilities", "/api/facilities/{id}"] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
    }

    #[tokio::test]
    async fn test_scalar_ui_is_served() {
        let fixture = TestFixture::new(vec![]);
        let response = fixture.get("/scalar").await;

        response.assert_ok();
        assert!(response
            .header("content-type")
            .is_some_and(|value| value.starts_with("text/html")));
    }
}
