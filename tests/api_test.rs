//! Router-level tests via in-process requests

use accesstech::api::{build_router, AppState};
use accesstech::auth::AuthService;
use accesstech::config::AuthConfig;
use accesstech::search::SearchEngine;
use accesstech::state::{
    InMemoryAuditSink, InMemoryCatalogStore, InMemoryReviewStore, InMemoryUserStore, MemoryCache,
    UserStore,
};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    users: Arc<InMemoryUserStore>,
}

fn app() -> TestApp {
    let catalog = Arc::new(InMemoryCatalogStore::new());
    let reviews = Arc::new(InMemoryReviewStore::new());
    let users = Arc::new(InMemoryUserStore::new());
    let cache = Arc::new(MemoryCache::new());

    let search = Arc::new(SearchEngine::new(
        catalog.clone(),
        reviews.clone(),
        cache.clone(),
        Arc::new(InMemoryAuditSink::new()),
    ));
    let auth = Arc::new(AuthService::new(
        users.clone(),
        cache,
        None,
        &AuthConfig::default(),
    ));

    let state = AppState::new(catalog, reviews, users.clone(), search, auth);
    TestApp {
        router: build_router(state),
        users,
    }
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_json(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user and walk the OTP challenge to a bearer token
async fn authenticate(app: &TestApp, email: &str) -> String {
    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/v1/auth/register",
            json!({"email": email, "password": "correct-horse"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let user_id = body["user_id"].as_str().unwrap().to_string();

    // Mailer is not wired in tests; read the OTP off the stored record
    let user = app.users.get_user(&user_id).await.unwrap().unwrap();
    let otp = user.otp.unwrap();

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/v1/auth/verify-otp",
            json!({"email": email, "otp": otp}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = app();
    let response = app.router.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn search_with_empty_query_is_bad_request() {
    let app = app();

    let response = app
        .router
        .clone()
        .oneshot(get("/v1/search?query="))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    // Missing parameter behaves the same as empty
    let response = app.router.clone().oneshot(get("/v1/search")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_is_open_to_anonymous_callers() {
    let app = app();
    let response = app
        .router
        .clone()
        .oneshot(get("/v1/search?query=reader"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn register_verify_and_profile_roundtrip() {
    let app = app();
    let token = authenticate(&app, "alice@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/auth/profile")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["email"], "alice@example.com");
    assert!(body.get("password_hash").is_none());
    assert!(body.get("otp").is_none());
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = app();

    let response = app
        .router
        .clone()
        .oneshot(get("/v1/auth/profile"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/auth/profile")
                .header(header::AUTHORIZATION, "Bearer not-a-real-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/v1/technologies",
            json!({"name": "NVDA", "description": "Screen reader"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_the_session_token() {
    let app = app();
    let token = authenticate(&app, "alice@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(authed_json("POST", "/v1/auth/logout", &token, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The token is gone; protected routes reject it
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/auth/profile")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Logging out again with the revoked token is unauthorized too
    let response = app
        .router
        .clone()
        .oneshot(authed_json("POST", "/v1/auth/logout", &token, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = app();
    authenticate(&app, "alice@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(post_json(
            "/v1/auth/register",
            json!({"email": "alice@example.com", "password": "another-pass"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn technology_create_then_search_end_to_end() {
    let app = app();
    let token = authenticate(&app, "curator@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(authed_json(
            "POST",
            "/v1/technologies",
            &token,
            json!({
                "name": "ScreenReader Pro",
                "description": "Full-featured screen reader",
                "category": "visual",
                "cost": "paid"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let technology = body_json(response).await;
    let technology_id = technology["id"].as_str().unwrap().to_string();

    let response = app
        .router
        .clone()
        .oneshot(get("/v1/search?query=reader"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let hits = body_json(response).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);
    assert_eq!(hits[0]["id"], technology_id.as_str());
    assert_eq!(hits[0]["avgRating"], 0.0);
    assert_eq!(hits[0]["reviewsCount"], 0);
}

#[tokio::test]
async fn review_rating_is_validated() {
    let app = app();
    let token = authenticate(&app, "reviewer@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(authed_json(
            "POST",
            "/v1/technologies",
            &token,
            json!({"name": "NVDA", "description": "Screen reader"}),
        ))
        .await
        .unwrap();
    let technology_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .router
        .clone()
        .oneshot(authed_json(
            "POST",
            "/v1/reviews",
            &token,
            json!({"technologyId": technology_id, "rating": 6, "comment": "too good"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .router
        .clone()
        .oneshot(authed_json(
            "POST",
            "/v1/reviews",
            &token,
            json!({"technologyId": technology_id, "rating": 5, "comment": "   "}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .router
        .clone()
        .oneshot(authed_json(
            "POST",
            "/v1/reviews",
            &token,
            json!({"technologyId": technology_id, "rating": 5, "comment": "Excellent"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let review = body_json(response).await;
    assert_eq!(review["rating"], 5);
    assert_eq!(review["technology"]["name"], "NVDA");
}

#[tokio::test]
async fn review_for_unknown_technology_is_not_found() {
    let app = app();
    let token = authenticate(&app, "reviewer@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(authed_json(
            "POST",
            "/v1/reviews",
            &token,
            json!({
                "technologyId": uuid::Uuid::new_v4(),
                "rating": 4,
                "comment": "Solid"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn review_updates_are_owner_only() {
    let app = app();
    let owner = authenticate(&app, "owner@example.com").await;
    let intruder = authenticate(&app, "intruder@example.com").await;

    let response = app
        .router
        .clone()
        .oneshot(authed_json(
            "POST",
            "/v1/technologies",
            &owner,
            json!({"name": "NVDA", "description": "Screen reader"}),
        ))
        .await
        .unwrap();
    let technology_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .router
        .clone()
        .oneshot(authed_json(
            "POST",
            "/v1/reviews",
            &owner,
            json!({"technologyId": technology_id, "rating": 4, "comment": "Good"}),
        ))
        .await
        .unwrap();
    let review_id = body_json(response).await["id"].as_str().unwrap().to_string();

    let response = app
        .router
        .clone()
        .oneshot(authed_json(
            "PUT",
            &format!("/v1/reviews/{}", review_id),
            &intruder,
            json!({"rating": 1}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .router
        .clone()
        .oneshot(authed_json(
            "PUT",
            &format!("/v1/reviews/{}", review_id),
            &owner,
            json!({"rating": 5}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["rating"], 5);
}
