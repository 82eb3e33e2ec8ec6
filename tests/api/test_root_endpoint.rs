// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Status, health and CORS tests
//!
//! Verifies GET /, GET /health and the single-origin CORS policy.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use ndarray::Array4;
use pneumonia_detection_api::{
    api::{create_router, AppState, HealthResponse, RootResponse, ROOT_MESSAGE},
    classifier::{ClassifierError, PneumoniaClassifier, ProbabilityScorer},
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const ORIGIN: &str = "http://localhost:3000";

struct CountingScorer {
    calls: AtomicUsize,
}

impl ProbabilityScorer for CountingScorer {
    fn score(&self, _input: &Array4<f32>) -> Result<f32, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(0.1)
    }

    fn name(&self) -> &str {
        "pneumonia_model"
    }
}

fn setup_app() -> (Router, Arc<CountingScorer>) {
    let scorer = Arc::new(CountingScorer {
        calls: AtomicUsize::new(0),
    });
    let state = AppState::new(PneumoniaClassifier::new(scorer.clone()));
    (create_router(state, ORIGIN).unwrap(), scorer)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[cfg(test)]
mod root_endpoint_tests {
    use super::*;

    #[tokio::test]
    async fn test_root_returns_status_message() {
        let (app, scorer) = setup_app();

        let response = app.oneshot(get("/")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: RootResponse = body_json(response).await;
        assert_eq!(body.message, "Pneumonia Detection API Running");
        assert_eq!(body.message, ROOT_MESSAGE);
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_root_is_stable_across_requests() {
        let (app, _scorer) = setup_app();

        for _ in 0..3 {
            let response = app.clone().oneshot(get("/")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body: serde_json::Value = body_json(response).await;
            assert_eq!(body, serde_json::json!({"message": ROOT_MESSAGE}));
        }
    }

    #[tokio::test]
    async fn test_health_reports_model_name() {
        let (app, scorer) = setup_app();

        let response = app.oneshot(get("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let health: HealthResponse = body_json(response).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.model, "pneumonia_model");
        assert!(health.version.starts_with('v'));
        assert_eq!(scorer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (app, _scorer) = setup_app();
        let response = app.oneshot(get("/v1/predict")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // =============================================================================
    // CORS
    // =============================================================================

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let (app, _scorer) = setup_app();

        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, ORIGIN)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            ORIGIN
        );
    }

    #[tokio::test]
    async fn test_cors_ignores_other_origins() {
        let (app, _scorer) = setup_app();

        let request = Request::builder()
            .uri("/")
            .header(header::ORIGIN, "http://evil.example.com")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_cors_preflight_from_other_origin_is_not_allowed() {
        let (app, _scorer) = setup_app();

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/predict")
            .header(header::ORIGIN, "http://evil.example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_cors_preflight_for_predict() {
        let (app, _scorer) = setup_app();

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/predict")
            .header(header::ORIGIN, ORIGIN)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            ORIGIN
        );
        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    }

    #[test]
    fn test_invalid_origin_rejected_at_startup() {
        let scorer = Arc::new(CountingScorer {
            calls: AtomicUsize::new(0),
        });
        let state = AppState::new(PneumoniaClassifier::new(scorer));
        assert!(create_router(state, "http://bad\norigin").is_err());
    }

    #[test]
    fn test_wildcard_origin_rejected_at_startup() {
        let scorer = Arc::new(CountingScorer {
            calls: AtomicUsize::new(0),
        });
        let state = AppState::new(PneumoniaClassifier::new(scorer));
        let err = create_router(state, "*").unwrap_err();
        assert!(err.to_string().contains("Wildcard"));
    }
}
