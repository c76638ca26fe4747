//! Integration tests for the HTTP surface

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use nutriguide_server::{
    build_engine,
    config::ServerConfig,
    handlers::{create_router, AppState, HealthCheckResponse},
};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt; // for oneshot

/// Router over an in-memory store seeded from `data/seed.json`
fn create_test_app() -> Router {
    let mut config = ServerConfig::default_test_config();
    config.seed_path =
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data/seed.json"));

    let engine = build_engine(&config).unwrap();
    create_router(AppState {
        engine: Arc::new(engine),
    })
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

async fn get(uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(create_test_app(), request).await
}

async fn post_guide(body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/diseases/guide")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(create_test_app(), request).await
}

fn foods(items: &Value) -> Vec<&str> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["food"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check_endpoint() {
    let response = create_test_app()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let health: HealthCheckResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.ingredients, 10);
    assert_eq!(health.conditions, 6);
    assert_eq!(health.interactions, 20);
}

#[tokio::test]
async fn test_compatibility_endpoint() {
    let (status, body) = get("/api/ingredients/Garlic/compatibility").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ingredient"], "Garlic");
    assert_eq!(body["category"], "allium");
    assert_eq!(
        foods(&body["beneficial"]),
        vec!["Hypertension", "Common Cold", "Honey", "Lemon"]
    );
    assert_eq!(foods(&body["avoid"]), vec!["Milk"]);

    let milk = &body["avoid"][0];
    assert_eq!(milk["severity"], 1);
    assert_eq!(milk["evidenceLabel"], "Anecdotal");
    assert_eq!(milk["sources"][0]["label"], "Unverified");
    assert!(milk["sources"][0]["url"].is_null());
}

#[tokio::test]
async fn test_compatibility_percent_encoded_alias() {
    let (status, body) = get("/api/ingredients/table%20salt/compatibility?filter=avoid").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ingredient"], "Salt");
    assert_eq!(foods(&body["avoid"]), vec!["Hypertension", "Kidney Stones"]);
    assert!(body["beneficial"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_compatibility_filter_is_case_insensitive() {
    let (status, body) = get("/api/ingredients/garlic/compatibility?filter=BENEFICIAL").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["avoid"].as_array().unwrap().is_empty());
    assert_eq!(body["beneficial"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_invalid_filter_is_bad_request() {
    let (status, body) = get("/api/ingredients/garlic/compatibility?filter=harmful").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("harmful"));
}

#[tokio::test]
async fn test_unknown_ingredient_is_not_found() {
    let (status, body) = get("/api/ingredients/not-a-real-food/compatibility").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No ingredient matches 'not-a-real-food'");
}

#[tokio::test]
async fn test_guide_endpoint() {
    let (status, body) =
        post_guide(r#"{"diseases": ["hypertension", "kidney stones"], "filter": "all"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["diseases"], serde_json::json!(["Hypertension", "Kidney Stones"]));
    assert_eq!(foods(&body["avoid"]), vec!["Salt", "Spinach"]);
    assert_eq!(foods(&body["beneficial"]), vec!["Garlic", "Oats"]);
    assert_eq!(
        body["avoid"][0]["affectedDiseases"],
        serde_json::json!(["Hypertension", "Kidney Stones"])
    );
    assert!(body["unresolved"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_guide_avoid_dominates() {
    let (status, body) = post_guide(r#"{"diseases": ["Gout, Anemia"]}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["beneficial"].as_array().unwrap().is_empty());
    assert_eq!(foods(&body["avoid"]), vec!["Red Meat", "Green Tea", "Spinach"]);
}

#[tokio::test]
async fn test_guide_reports_unresolved() {
    let (status, body) = post_guide(r#"{"diseases": ["gout", "scurvy"], "filter": "avoid"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unresolved"], serde_json::json!(["scurvy"]));
}

#[tokio::test]
async fn test_guide_errors() {
    let (status, body) = post_guide(r#"{"diseases": ["scurvy"]}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("scurvy"));

    let (status, _) = post_guide(r#"{"diseases": []}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_guide(r#"{"diseases": ["gout"], "filter": "sometimes"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_guide(r#"{"diseases": "gout""#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_sources_endpoint() {
    let (_, compat) = get("/api/ingredients/red%20meat/compatibility?filter=avoid").await;
    let id = compat["avoid"][0]["interactionId"].as_i64().unwrap();

    let (status, body) = get(&format!("/api/interactions/{}/sources", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["interactionId"], id);

    let sources = body["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0]["label"], "WHO healthy diet fact sheet");
    assert_eq!(sources[0]["year"], 2019);
    assert_eq!(sources[1]["label"], "Purine content of foods review");

    // The card citation is the first audited source.
    assert_eq!(compat["avoid"][0]["sources"][0]["label"], sources[0]["label"]);
}

#[tokio::test]
async fn test_sources_errors() {
    let (status, _) = get("/api/interactions/424242/sources").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get("/api/interactions/abc/sources").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_resolve_endpoint() {
    let (status, body) = get("/api/resolve?q=high%20blood%20pressure").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "condition");
    assert_eq!(body["slug"], "hypertension");
    assert_eq!(body["name"], "Hypertension");

    let (status, body) = get("/api/resolve?q=Oatmeal").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "ingredient");
    assert_eq!(body["name"], "Oats");

    let (status, _) = get("/api/resolve").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get("/api/resolve?q=unobtainium").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_requests_use_json_envelope() {
    let cases = [
        "/api/ingredients/garlic/compatibility?filter=avoid&filter=all",
        "/api/ingredients/%FF/compatibility",
        "/api/resolve?q=a&q=b",
        "/api/interactions/abc/sources",
    ];

    for uri in cases {
        let (status, body) = get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert!(
            !body["message"].as_str().unwrap_or_default().is_empty(),
            "{}",
            uri
        );
    }
}
