use crate::openapi::HEALTH_TAG;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use log::warn;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Basic health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct Health {
    status: &'static str,
    details: Option<Value>,
    #[serde(skip)]
    status_code: StatusCode,
}

impl IntoResponse for Health {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({
            "status": self.status
        });

        if let Some(Value::Object(obj)) = self.details {
            for (key, value) in obj {
                body[key] = value;
            }
        }

        (self.status_code, Json(body)).into_response()
    }
}

/// Liveness probe, answers without touching the store
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is alive", body = Health)
    )
)]
async fn health_check() -> Health {
    Health {
        status: "ok",
        details: Some(serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
        })),
        status_code: StatusCode::OK,
    }
}

/// Readiness probe, pings the facility store
#[utoipa::path(
    get,
    path = "/ready",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Facility store is reachable", body = Health),
        (status = 503, description = "Facility store is not reachable", body = Health)
    )
)]
async fn ready_check(State(state): State<AppState>) -> Health {
    match state.health_check().await {
        Ok(()) => Health {
            status: "ok",
            details: Some(serde_json::json!({
                "store_status": "healthy"
            })),
            status_code: StatusCode::OK,
        },
        Err(err) => {
            warn!("Readiness check failed: {}", err);
            Health {
                status: "error",
                details: Some(serde_json::json!({
                    "store_status": "unhealthy",
                    "error": err,
                })),
                status_code: StatusCode::SERVICE_UNAVAILABLE,
            }
        }
    }
}

pub(super) fn router() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(ready_check))
}

#[cfg(test)]
mod test {
    use crate::test_utils::TestFixture;
    use chrono::DateTime;
    use facility_store::{InMemoryFacilityStore, StoreError};
    use http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_health_endpoint() {
        let fixture = TestFixture::new(vec![]);
        let response = fixture.get("/health").await;

        response.assert_ok();
        assert_eq!(response.json["status"], "ok");
        let timestamp = response.json["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[tokio::test]
    async fn test_ready_endpoint() {
        let fixture = TestFixture::new(vec![]);
        let response = fixture.get("/ready").await;

        response.assert_ok();
        assert_eq!(
            response.json,
            json!({
                "status": "ok",
                "store_status": "healthy",
            })
        );
    }

    #[tokio::test]
    async fn test_ready_endpoint_store_down() {
        let store = InMemoryFacilityStore::default()
            .failing_with(StoreError::Connection("connection refused".to_string()));
        let fixture = TestFixture::with_store(store);
        let response = fixture.get("/ready").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.json,
            json!({
                "status": "error",
                "store_status": "unhealthy",
                "error": "Connection error: connection refused",
            })
        );
    }

    #[tokio::test]
    async fn test_health_does_not_touch_store() {
        let store = InMemoryFacilityStore::default()
            .failing_with(StoreError::Connection("connection refused".to_string()));
        let fixture = TestFixture::with_store(store);

        fixture.get("/health").await.assert_ok();
    }
}
