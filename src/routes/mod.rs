use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{Accounts, Catalog},
};

pub mod auth;
pub mod chatbot;
pub mod dashboard;
pub mod products;
pub mod profile;

/// Shared handles available to every handler
pub struct AppState {
    pub catalog: Arc<dyn Catalog>,
    pub accounts: Arc<dyn Accounts>,
    pub config: Config,
}

impl AppState {
    pub fn new(catalog: Arc<dyn Catalog>, accounts: Arc<dyn Accounts>, config: Config) -> Self {
        Self {
            catalog,
            accounts,
            config,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            // Request IDs are assigned before the trace span is created
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // Profile
        .route(
            "/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        // Assistant
        .route("/chatbot", post(chatbot::chatbot))
        .route("/chatbot/history", get(chatbot::history))
        // Catalog
        .route("/products/search", get(products::search))
        .route("/products/:id", get(products::get_product))
        .route("/categories", get(products::categories))
        // Overview
        .route("/dashboard", get(dashboard::dashboard))
        .route("/user-stats", get(dashboard::user_stats))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
