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

//! roomgate API server entry point.
//!
//! A standalone Axum service that validates identity-provider bearer tokens
//! and issues JWT room access tokens for the media server.

use roomgate_api::config::Config;
use roomgate_api::routes;
use roomgate_api::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env file is normal in containers.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().expect("failed to load configuration");
    for warning in config.startup_warnings() {
        tracing::warn!("{warning}");
    }

    let state = AppState::new(&config).expect("failed to initialise token verifier");
    let app = routes::router(&config)
        .layer(routes::cors_layer(&config))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("failed to bind listener");

    tracing::info!("roomgate API listening on {}", config.listen_addr);

    axum::serve(listener, app).await.expect("server error");
}
