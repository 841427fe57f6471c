use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router
};
use dx_rating_processor::{
    api::{build_router, AppState},
    config::RatingConfig,
    database::store::ReferenceStore,
    model::structures::processing_mode::ProcessingMode,
    render::Presenter,
    utils::test_utils::generate_reference_index
};
use serde_json::Value;
use tower::util::ServiceExt;

use crate::common::init_test_env;

const SUBMISSION: &str = r#"[
    {"sheetId": "Foo__x__dx__y__master", "achievementRate": 99.2},
    {"sheetId": "Bar__x__std__y__expert", "achievementRate": 100.1},
    {"sheetId": "Baz__x__std__y__master", "achievementRate": 100.5},
    {"sheetId": "broken", "achievementRate": 90.0}
]"#;

fn setup_app(loaded: bool, config: RatingConfig) -> Router {
    init_test_env();
    let store = if loaded {
        ReferenceStore::with_index(generate_reference_index())
    } else {
        ReferenceStore::new()
    };

    build_router(AppState::new(Arc::new(store), &config, Presenter::default()))
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
}

async fn extract_json(body: Body) -> Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}

#[tokio::test]
async fn test_health_reports_loading_state() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let response = setup_app(false, RatingConfig::default()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "loading");
    assert_eq!(body["referenceLoaded"], false);

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = setup_app(true, RatingConfig::default()).oneshot(request).await.unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["referenceTitles"], 3);
    assert_eq!(body["module"], "dx-rating-processor");
}

#[tokio::test]
async fn test_rate() {
    let response = setup_app(true, RatingConfig::default())
        .oneshot(post("/api/ratings", SUBMISSION))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;

    assert_eq!(body["recentList"][0]["songName"], "Foo");
    assert_eq!(body["recentList"][0]["rating"], 278);
    // Baz: 13 * 100.5 * 0.224, Bar: 12.4 * 100.1 * 0.216
    assert_eq!(body["olderList"][0]["songName"], "Baz");
    assert_eq!(body["olderList"][0]["rating"], 292);
    assert_eq!(body["olderList"][1]["rating"], 268);
    assert_eq!(body["totals"]["total"], 278 + 292 + 268);
    assert_eq!(body["skipped"][0]["index"], 3);
}

#[tokio::test]
async fn test_rate_rejects_non_array() {
    let response = setup_app(true, RatingConfig::default())
        .oneshot(post("/api/ratings", r#"{"sheetId": "Foo__x__dx__y__master"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Invalid input");
    assert!(body["details"].as_str().unwrap().contains("must be a JSON array"));
}

#[tokio::test]
async fn test_rate_before_reference_is_loaded() {
    let response = setup_app(false, RatingConfig::default())
        .oneshot(post("/api/ratings", SUBMISSION))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Reference data unavailable");
}

#[tokio::test]
async fn test_rate_strict_mode() {
    let config = RatingConfig {
        mode: ProcessingMode::Strict,
        ..Default::default()
    };
    let response = setup_app(true, config).oneshot(post("/api/ratings", SUBMISSION)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Invalid record");
    assert!(body["details"].as_str().unwrap().contains("broken"));
}

#[tokio::test]
async fn test_rate_image() {
    let response = setup_app(true, RatingConfig::default())
        .oneshot(post("/api/ratings/image", SUBMISSION))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");

    let svg = String::from_utf8(body_bytes(response.into_body()).await).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(">278</text>"));
    assert_eq!(svg.matches("NO DATA").count(), 50 - 3);
}

#[tokio::test]
async fn test_render_selection() {
    let body = r#"{
        "recentList": [],
        "olderList": [{
            "songName": "Baz",
            "chartType": 0,
            "difficulty": 4,
            "achievement": 98.0,
            "level": 14.0,
            "version": 19000
        }]
    }"#;
    let response = setup_app(false, RatingConfig::default())
        .oneshot(post("/api/render", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let svg = String::from_utf8(body_bytes(response.into_body()).await).unwrap();
    // 14 * 98.0 * 0.203
    assert!(svg.contains(">278</text>"));
    assert!(svg.contains("#e1beff"));
    assert!(svg.contains("OLD CHARTS (1/35)"));
}

#[tokio::test]
async fn test_render_rejects_invalid_body() {
    let response = setup_app(true, RatingConfig::default())
        .oneshot(post("/api/render", r#"{"recentList": 5}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"], "Invalid input");
}
