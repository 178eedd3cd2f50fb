/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! Axum router configuration for the roomgate API.

pub mod auth;
pub mod tokens;

use axum::{
    http::{HeaderValue, Uri},
    routing::{any, get, post},
    Json, Router,
};
use roomgate_types::responses::{HealthResponse, ServiceInfoResponse};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;

/// Build the full application router.
///
/// With `config.static_dir` set, unmatched non-API paths are served from that
/// directory with `index.html` as the single-page-app fallback.
pub fn router(config: &Config) -> Router<AppState> {
    let api = Router::new()
        .route("/health", get(health))
        // Room tokens
        .route("/api/tokens", post(tokens::create_token))
        // Identity
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/callback", get(auth::callback))
        .route("/api/{*rest}", any(not_found));

    match &config.static_dir {
        Some(dir) => {
            tracing::info!("Serving frontend from {}", dir.display());
            let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
            api.fallback_service(spa)
        }
        None => api.route("/", get(service_info)).fallback(not_found),
    }
}

/// CORS policy from the configured origin list. `*` allows any origin.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.cors_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{origin}'");
                None
            }
        })
        .collect();
    cors.allow_origin(origins)
}

/// GET /health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// GET /
async fn service_info() -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        message: "roomgate API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(uri.path())
}
