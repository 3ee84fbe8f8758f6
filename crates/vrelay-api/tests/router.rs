//! Router tests with fake detection backends.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use vrelay_api::{create_router, ApiConfig, AppState, DependencyCheck};
use vrelay_core::{
    DetectionOrchestrator, OrchestratorConfig, PrimaryDetector, SpecialistClassifier,
    SpecialistResult,
};
use vrelay_models::{BoundingBox, Detection, DetectionBatch, PrimaryResponse};

const BOUNDARY: &str = "vrelay-test-boundary";

struct FakePrimary(PrimaryResponse);

#[async_trait]
impl PrimaryDetector for FakePrimary {
    async fn detect(&self, _image: &[u8]) -> PrimaryResponse {
        self.0.clone()
    }

    fn name(&self) -> &'static str {
        "fake-primary"
    }
}

struct FakeSpecialist {
    batch: DetectionBatch,
    calls: AtomicUsize,
}

impl SpecialistClassifier for FakeSpecialist {
    fn classify(&self, _image: &[u8]) -> SpecialistResult<DetectionBatch> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.batch.clone())
    }

    fn name(&self) -> &'static str {
        "fake-specialist"
    }
}

struct FixedReachability(bool);

#[async_trait]
impl DependencyCheck for FixedReachability {
    async fn is_reachable(&self) -> bool {
        self.0
    }
}

struct Harness {
    router: Router,
    specialist: Arc<FakeSpecialist>,
}

fn harness(primary: PrimaryResponse, specialist_batch: DetectionBatch, reachable: bool) -> Harness {
    harness_with(ApiConfig::default(), primary, specialist_batch, reachable)
}

fn harness_with(
    config: ApiConfig,
    primary: PrimaryResponse,
    specialist_batch: DetectionBatch,
    reachable: bool,
) -> Harness {
    let specialist = Arc::new(FakeSpecialist {
        batch: specialist_batch,
        calls: AtomicUsize::new(0),
    });
    let orchestrator = DetectionOrchestrator::new(
        Arc::new(FakePrimary(primary)),
        specialist.clone(),
        OrchestratorConfig::default(),
    );
    let state = AppState::new(config, Arc::new(orchestrator), Arc::new(FixedReachability(reachable)));

    Harness {
        router: create_router(state, None),
        specialist,
    }
}

fn multipart_request(field: &str, payload: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"snapshot.jpg\"\r\n",
            field
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/v1/vision/detection")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn possum() -> Detection {
    Detection::new("common brushtail possum", 0.92)
        .with_bbox(BoundingBox::full_frame(640, 480))
        .with_extra("scientific_name", "trichosurus vulpecula")
}

#[tokio::test]
async fn test_detection_fuses_specialist_result() {
    let h = harness(
        PrimaryResponse::ok(vec![Detection::new("cat", 0.8).with_bbox(BoundingBox::new(10, 20, 110, 220))]),
        vec![possum()],
        true,
    );

    let response = h
        .router
        .oneshot(multipart_request("image", b"jpeg-bytes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 3);
    assert_eq!(body["message"], vrelay_models::PROCESSED_MESSAGE);
    assert_eq!(body["predictions"][0]["label"], "cat");
    assert_eq!(body["predictions"][1]["label"], "common brushtail possum");
    assert_eq!(body["predictions"][1]["scientific_name"], "trichosurus vulpecula");
    assert_eq!(body["predictions"][2]["label"], "animal");
    assert_eq!(body["predictions"][2]["x_max"], 640);
    assert_eq!(h.specialist.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_detection_skips_specialist_for_non_trigger_labels() {
    let h = harness(
        PrimaryResponse::ok(vec![Detection::new("car", 0.9)]),
        vec![possum()],
        true,
    );

    let response = h
        .router
        .oneshot(multipart_request("image", b"jpeg-bytes"))
        .await
        .unwrap();
    let body = json_body(response).await;

    assert_eq!(body["count"], 1);
    assert_eq!(body["predictions"][0]["label"], "car");
    assert_eq!(h.specialist.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_detection_succeeds_when_primary_is_down() {
    let h = harness(PrimaryResponse::failed(), vec![possum()], true);

    let response = h
        .router
        .oneshot(multipart_request("image", b"jpeg-bytes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_missing_image_field_is_bad_request() {
    let h = harness(PrimaryResponse::ok(vec![]), vec![], true);

    let response = h
        .router
        .oneshot(multipart_request("file", b"jpeg-bytes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["detail"].as_str().unwrap().contains("image"));
    assert_eq!(h.specialist.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_image_is_bad_request() {
    let h = harness(PrimaryResponse::ok(vec![]), vec![], true);

    let response = h
        .router
        .oneshot(multipart_request("image", b""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_non_multipart_body_is_rejected() {
    let h = harness(PrimaryResponse::ok(vec![]), vec![], true);

    let request = Request::builder()
        .method("POST")
        .uri("/v1/vision/detection")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = h.router.oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let config = ApiConfig {
        max_body_size: 1024,
        ..Default::default()
    };
    let h = harness_with(config, PrimaryResponse::ok(vec![]), vec![], true);

    let response = h
        .router
        .oneshot(multipart_request("image", &[0u8; 4096]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(h.specialist.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_request_id_is_echoed_or_generated() {
    let h = harness(PrimaryResponse::ok(vec![]), vec![], true);

    let request = Request::builder()
        .uri("/health")
        .header("X-Request-ID", "cam3-0001")
        .body(Body::empty())
        .unwrap();
    let response = h.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()["x-request-id"], "cam3-0001");

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = h.router.oneshot(request).await.unwrap();
    let generated = response.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(generated.len(), 36);
}

#[tokio::test]
async fn test_health_endpoints() {
    let h = harness(PrimaryResponse::ok(vec![]), vec![], false);

    for path in ["/health", "/healthz"] {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let response = h.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert!(body["version"].is_string());
    }
}

#[tokio::test]
async fn test_ready_reports_primary_reachability() {
    let h = harness(PrimaryResponse::ok(vec![]), vec![], true);
    let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
    let response = h.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["primary_detector"]["status"], "ok");
    assert_eq!(body["checks"]["specialist_gate"]["busy"], false);

    let h = harness(PrimaryResponse::ok(vec![]), vec![], false);
    let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
    let response = h.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["primary_detector"]["status"], "unreachable");
}

#[tokio::test]
async fn test_metrics_route_absent_when_disabled() {
    let h = harness(PrimaryResponse::ok(vec![]), vec![], true);
    let request = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let response = h.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
