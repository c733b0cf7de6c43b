use crate::api::{handlers, AppState};
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/health/live", get(handlers::health_check))
        .route("/health/ready", get(handlers::health_check))
        // Authentication
        .route("/v1/auth/register", post(handlers::auth::register))
        .route("/v1/auth/login", post(handlers::auth::login))
        .route("/v1/auth/verify-otp", post(handlers::auth::verify_otp))
        .route("/v1/auth/logout", post(handlers::auth::logout))
        .route("/v1/auth/profile", get(handlers::auth::get_profile))
        .route("/v1/auth/profile", put(handlers::auth::update_profile))
        // Technology catalog
        .route("/v1/technologies", post(handlers::technologies::create_technology))
        .route("/v1/technologies", get(handlers::technologies::list_technologies))
        .route("/v1/technologies/:id", get(handlers::technologies::get_technology))
        .route("/v1/technologies/:id", put(handlers::technologies::update_technology))
        .route(
            "/v1/technologies/:id",
            axum::routing::delete(handlers::technologies::delete_technology),
        )
        // Reviews
        .route("/v1/reviews", post(handlers::reviews::create_review))
        .route("/v1/reviews", get(handlers::reviews::list_reviews))
        .route("/v1/reviews/:id", get(handlers::reviews::get_review))
        .route("/v1/reviews/:id", put(handlers::reviews::update_review))
        .route(
            "/v1/reviews/:id",
            axum::routing::delete(handlers::reviews::delete_review),
        )
        // Search
        .route("/v1/search", get(handlers::search::search))
        // Add state
        .with_state(state)
        // Add middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}
