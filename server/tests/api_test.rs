//! Integration tests for the recognition HTTP API.
//!
//! The classifier and fetcher are stubbed so the full request path can run
//! without a model server or network access.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use recognition_common::Prediction;
use recognition_server::classify::{Classifier, ImageFetcher, PipelineError};
use recognition_server::{api, AppState, Config, InferenceOrchestrator, TaskRegistry};

/// Succeeds with dummy bytes unless the URL mentions "unreachable".
struct StubFetcher;

#[async_trait]
impl ImageFetcher for StubFetcher {
    async fn fetch_and_decode(&self, url: &str) -> Result<Vec<u8>, PipelineError> {
        if url.contains("unreachable") {
            Err(PipelineError::Fetch(format!("{url}: connection refused")))
        } else {
            Ok(vec![0u8; 8])
        }
    }
}

/// Returns the same ranked list for every image.
struct StubClassifier;

#[async_trait]
impl Classifier for StubClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<Vec<Prediction>, PipelineError> {
        Ok(vec![
            Prediction::new("running shoe", 0.59442),
            Prediction::new("sandal", 0.18219),
        ])
    }
}

fn test_app() -> Router {
    let config = Config::default();
    let registry = Arc::new(TaskRegistry::new());
    let orchestrator = Arc::new(InferenceOrchestrator::new(
        registry.clone(),
        Arc::new(StubFetcher),
        Arc::new(StubClassifier),
        config.classifier.top_k,
    ));
    let state = Arc::new(AppState::new(config, registry, orchestrator));

    Router::new().merge(api::router()).with_state(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(match body {
            Some(value) => Body::from(value.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };
    (status, value)
}

fn new_imgs(urls: &[Value]) -> Value {
    json!({ "new_imgs": urls })
}

#[tokio::test]
async fn test_record_lifecycle_scenario() {
    let app = test_app();

    // Empty registry lists an empty collection.
    let (status, body) = send(&app, Method::GET, "/images", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "images": [] }));

    // First created record gets id 1.
    let (status, body) = send(
        &app,
        Method::POST,
        "/images",
        Some(new_imgs(&[json!({ "url": "http://x/a.jpg" })])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body[0]["id"], 1);
    assert_eq!(body[0]["url"], "http://x/a.jpg");
    assert_eq!(body[0]["title"], "");
    assert_eq!(body[0]["resize"], false);

    // Delete it, then it is gone.
    let (status, body) = send(&app, Method::DELETE, "/images/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "result": true }));

    let (status, body) = send(&app, Method::GET, "/images/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "not found" }));
}

#[tokio::test]
async fn test_deleted_id_not_reused_over_http() {
    let app = test_app();

    send(
        &app,
        Method::POST,
        "/images",
        Some(new_imgs(&[json!({ "url": "http://x/a.jpg" })])),
    )
    .await;
    send(&app, Method::DELETE, "/images/1", None).await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/images",
        Some(new_imgs(&[json!({ "url": "http://x/b.jpg" })])),
    )
    .await;
    assert_eq!(body[0]["id"], 2);
}

#[tokio::test]
async fn test_add_images_rejects_non_json_body() {
    let app = test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/images")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("this is not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({ "error": "missing json data" }));
}

#[tokio::test]
async fn test_add_images_partial_acceptance() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/images",
        Some(new_imgs(&[
            json!({ "url": "http://x/a.jpg", "title": "Nikes" }),
            json!({ "title": "entry without url" }),
            json!({ "url": "http://x/b.jpg" }),
        ])),
    )
    .await;

    assert_eq!(status, StatusCode::GONE);
    let created = body.as_array().unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0]["title"], "Nikes");
    assert_eq!(created[1]["id"], 2);
}

#[tokio::test]
async fn test_delete_unknown_image() {
    let app = test_app();
    let (status, body) = send(&app, Method::DELETE, "/images/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "not found" }));
}

#[tokio::test]
async fn test_infer_attaches_formatted_scores() {
    let app = test_app();

    send(
        &app,
        Method::POST,
        "/images",
        Some(new_imgs(&[json!({ "url": "http://x/a.jpg" })])),
    )
    .await;

    let (status, body) = send(&app, Method::PUT, "/infer/1", Some(json!({ "id": 1 }))).await;
    assert_eq!(status, StatusCode::OK);

    let results = body["img"]["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["label"], "running shoe");
    // Scores travel as fixed four-decimal strings.
    assert_eq!(results[0]["score"], "0.5944");
    assert_eq!(results[1]["score"], "0.1822");
}

#[tokio::test]
async fn test_infer_requires_json_body_but_404_wins() {
    let app = test_app();

    send(
        &app,
        Method::POST,
        "/images",
        Some(new_imgs(&[json!({ "url": "http://x/a.jpg" })])),
    )
    .await;

    // Known id, no body: 400.
    let (status, body) = send(&app, Method::PUT, "/infer/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "missing json data" }));

    // Unknown id, no body: the id check runs first.
    let (status, _) = send(&app, Method::PUT, "/infer/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_inference_failure_is_data_not_error() {
    let app = test_app();

    send(
        &app,
        Method::POST,
        "/images",
        Some(new_imgs(&[json!({ "url": "http://unreachable/a.jpg" })])),
    )
    .await;

    let (status, body) = send(&app, Method::PUT, "/infer/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    let error = body["img"]["results"]["error"].as_str().unwrap();
    assert!(error.starts_with("failed to fetch image:"), "got {error}");
}

#[tokio::test]
async fn test_infer_undone_runs_once_then_404() {
    let app = test_app();

    send(
        &app,
        Method::POST,
        "/images",
        Some(new_imgs(&[
            json!({ "url": "http://x/a.jpg" }),
            json!({ "url": "http://unreachable/b.jpg" }),
        ])),
    )
    .await;

    let (status, body) = send(&app, Method::PUT, "/inferundone", None).await;
    assert_eq!(status, StatusCode::OK);
    let images = body["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert!(images.iter().all(|img| !img["results"].is_null()));

    // Everything has an outcome now, failures included.
    let (status, body) = send(&app, Method::PUT, "/inferundone", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "no images pending inference" }));
}

#[tokio::test]
async fn test_images_infer_creates_and_classifies() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/imagesinfer",
        Some(new_imgs(&[
            json!({ "url": "http://x/a.jpg" }),
            json!({ "title": "no url" }),
        ])),
    )
    .await;

    assert_eq!(status, StatusCode::GONE);
    let created = body.as_array().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0]["results"][0]["label"], "running shoe");

    // The classified record is not pending anymore.
    let (status, body) = send(&app, Method::PUT, "/inferundone", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "no images pending inference" }));
}

#[tokio::test]
async fn test_index_and_health() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("Hello, World!".to_string()));

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_app();
    let (status, _) = send(&app, Method::GET, "/img/api/a-bad-address", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
