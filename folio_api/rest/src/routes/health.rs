use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use folio_core_health_contracts::{HealthFeatureService, HealthStatus};
use serde::Serialize;

pub fn router(service: Arc<impl HealthFeatureService>) -> Router<()> {
    Router::new()
        .route("/health", routing::get(health))
        .with_state(service)
}

#[derive(Serialize)]
struct HealthResponse {
    http: bool,
    email: bool,
}

async fn health(service: State<Arc<impl HealthFeatureService>>) -> Response {
    let status = service.get_status().await;
    let HealthStatus { email } = status;

    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (code, Json(HealthResponse { http: true, email })).into_response()
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};
    use folio_core_health_contracts::MockHealthFeatureService;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn get(status: HealthStatus) -> (StatusCode, Value) {
        let sut = router(Arc::new(
            MockHealthFeatureService::new().with_get_status(status),
        ));
        let response = sut
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let code = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (code, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn healthy() {
        let (code, body) = get(HealthStatus { email: true }).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body, json!({"http": true, "email": true}));
    }

    #[tokio::test]
    async fn unhealthy() {
        let (code, body) = get(HealthStatus { email: false }).await;
        assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"http": true, "email": false}));
    }
}
