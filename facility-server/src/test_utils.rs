use crate::config::FacilitiesConfig;
use crate::create_app;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use facility_store::{Facility, InMemoryFacilityStore};
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Test fixture for exercising the API against an in-memory facility store.
///
/// The fixture builds the full application router, including CORS and panic
/// handling, so requests pass through the same layers as in production.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new(vec![Facility {
///         frs_id: Some("110000000001".to_string()),
///         ..Default::default()
///     }]);
///
///     let response = fixture.get("/api/facilities/110000000001").await;
///
///     response.assert_ok();
///     assert_eq!(response.json["data"]["FRS_ID"], "110000000001");
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
}

impl TestFixture {
    /// Creates a fixture serving the given facilities with default configuration
    pub fn new(facilities: Vec<Facility>) -> Self {
        Self::with_store(InMemoryFacilityStore::new(facilities))
    }

    /// Creates a fixture over an existing store.
    ///
    /// Keep a clone of the store to inspect call counts after requests.
    pub fn with_store(store: InMemoryFacilityStore) -> Self {
        Self::with_config(FacilitiesConfig::default(), store)
    }

    /// Creates a fixture with custom configuration, e.g. production mode or
    /// a restricted CORS origin list
    pub fn with_config(config: FacilitiesConfig, store: InMemoryFacilityStore) -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let state = AppState::with_store(config, Arc::new(store));
        let app = create_app(state);

        Self { app }
    }

    /// Initializes the test logger with the given level.
    ///
    /// Called by every constructor; only the first call takes effect.
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Creates a request builder for the given method and URI
    pub fn request_builder(&self, method: Method, uri: impl AsRef<str>) -> http::request::Builder {
        Request::builder()
            .method(method)
            .uri(uri.as_ref())
            .header("Accept", "application/json")
    }

    /// Sends a GET request to the specified URI
    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request and returns a TestResponse.
    ///
    /// Use this with [`TestFixture::request_builder`] when a test needs
    /// custom headers or methods.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        // Try to parse as JSON, defaulting to empty object if parsing fails or empty body
        let json = if !body.is_empty() {
            serde_json::from_slice(&body).unwrap_or_else(|_| serde_json::json!({}))
        } else {
            serde_json::json!({})
        };

        TestResponse {
            status,
            headers,
            json,
        }
    }
}

/// Response from a test request that provides convenient access to status,
/// headers and JSON body.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body as JSON (if present and valid JSON)
    pub json: Value,
}

impl TestResponse {
    /// Asserts that the response has the expected status code.
    ///
    /// # Panics
    ///
    /// Panics if the status code doesn't match the expected value.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            serde_json::to_string_pretty(&self.json).unwrap_or_default()
        );
        self
    }

    /// Asserts that the response status is OK (200).
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Returns a header value as a string, if present
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}
