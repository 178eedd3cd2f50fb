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

//! Integration tests for bearer-token verification at the HTTP boundary.


use std::time::Duration;

use axum::body::Body;
use axum::http::{header, StatusCode};
use roomgate_types::responses::{APIResponse, CallbackResponse, HealthResponse, ProfileResponse};
use roomgate_types::APIError;
use serde_json::json;
use test_helpers::*;
use tower::ServiceExt;

/// Build a request WITHOUT an Authorization header.
fn unauthenticated_request(method: &str, uri: &str) -> axum::http::request::Builder {
    axum::http::Request::builder().method(method).uri(uri)
}

#[tokio::test]
async fn test_valid_token_yields_claims() {
    let idp = TestIdp::start().await;
    let app = build_app(&test_config(&idp.issuer()));

    let req = request_with_bearer("GET", "/api/auth/me", &idp.token_for("user-42"))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: APIResponse<ProfileResponse> = response_json(resp).await;
    assert!(body.success);
    assert_eq!(body.result.sub, "user-42");
    assert_eq!(body.result.preferred_username.as_deref(), Some("user-42-handle"));
    assert_eq!(body.result.name.as_deref(), Some("user-42 Example"));
}

#[tokio::test]
async fn test_missing_credential_unauthorized() {
    let idp = TestIdp::start().await;
    let app = build_app(&test_config(&idp.issuer()));

    let req = unauthenticated_request("GET", "/api/auth/me")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

    let body: APIResponse<APIError> = response_json(resp).await;
    assert!(!body.success);
    assert_eq!(body.result.code, "UNAUTHORIZED");
}

#[tokio::test]
async fn test_unknown_kid_unauthorized() {
    let idp = TestIdp::start().await;
    let app = build_app(&test_config(&idp.issuer()));

    let token = sign_id_token(Some("not-published"), &idp.claims_for("user-42"));
    let req = request_with_bearer("GET", "/api/auth/me", &token)
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: APIResponse<APIError> = response_json(resp).await;
    assert!(body
        .result
        .engineering_error
        .unwrap()
        .contains("not-published"));
}

#[tokio::test]
async fn test_wrong_audience_unauthorized() {
    let idp = TestIdp::start().await;
    let app = build_app(&test_config(&idp.issuer()));

    let mut claims = idp.claims_for("user-42");
    claims["aud"] = json!("someone-else");
    let req = request_with_bearer("GET", "/api/auth/me", &sign_id_token(Some(TEST_KID), &claims))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_detail_hidden_when_disabled() {
    let idp = TestIdp::start().await;
    let mut config = test_config(&idp.issuer());
    config.expose_error_detail = false;
    let app = build_app(&config);

    let req = request_with_bearer("GET", "/api/auth/me", "garbage")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: APIResponse<APIError> = response_json(resp).await;
    assert!(body.result.engineering_error.is_none());
}

#[tokio::test]
async fn test_jwks_server_error_is_service_unavailable() {
    let idp = TestIdp::start_empty().await;
    idp.mount_jwks_status(500).await;
    let app = build_app(&test_config(&idp.issuer()));

    let req = request_with_bearer("GET", "/api/auth/me", &idp.token_for("user-42"))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: APIResponse<APIError> = response_json(resp).await;
    assert_eq!(body.result.code, "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_unparseable_jwks_is_service_unavailable() {
    let idp = TestIdp::start_empty().await;
    idp.mount_jwks(json!({ "foo": 1 })).await;
    let app = build_app(&test_config(&idp.issuer()));

    let req = request_with_bearer("GET", "/api/auth/me", &idp.token_for("user-42"))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: APIResponse<APIError> = response_json(resp).await;
    assert_eq!(body.result.code, "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_jwks_timeout_is_service_unavailable() {
    let idp = TestIdp::start_empty().await;
    idp.mount_jwks_delayed(Duration::from_secs(3)).await;
    let app = build_app(&test_config(&idp.issuer()));

    let req = request_with_bearer("GET", "/api/auth/me", &idp.token_for("user-42"))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_missing_issuer_is_server_error() {
    let idp = TestIdp::start().await;
    let mut config = test_config(&idp.issuer());
    config.oidc.issuer_url = None;
    let app = build_app(&config);

    let req = request_with_bearer("GET", "/api/auth/me", &idp.token_for("user-42"))
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: APIResponse<APIError> = response_json(resp).await;
    assert_eq!(body.result.code, "CONFIGURATION_ERROR");
}

#[tokio::test]
async fn test_auth_disabled_returns_mock_user_for_any_credential() {
    let idp = TestIdp::start_empty().await;
    let mut config = test_config(&idp.issuer());
    config.require_auth = false;

    for req in [
        unauthenticated_request("GET", "/api/auth/me"),
        request_with_bearer("GET", "/api/auth/me", "definitely.not.valid"),
    ] {
        let app = build_app(&config);
        let resp = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body: APIResponse<ProfileResponse> = response_json(resp).await;
        assert_eq!(body.result.sub, "mock-user");
        assert_eq!(body.result.name.as_deref(), Some("Mock User"));
    }
}

#[tokio::test]
async fn test_callback_echoes_code_and_state() {
    let app = build_app(&test_config("http://127.0.0.1:9"));

    let req = unauthenticated_request("GET", "/api/auth/callback?code=abc&state=xyz")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: APIResponse<CallbackResponse> = response_json(resp).await;
    assert_eq!(body.result.code.as_deref(), Some("abc"));
    assert_eq!(body.result.state.as_deref(), Some("xyz"));
    assert!(body.result.error.is_none());
}

#[tokio::test]
async fn test_callback_reports_provider_error() {
    let app = build_app(&test_config("http://127.0.0.1:9"));

    let req = unauthenticated_request("GET", "/api/auth/callback?error=access_denied")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();

    let body: APIResponse<CallbackResponse> = response_json(resp).await;
    assert_eq!(body.result.error.as_deref(), Some("access_denied"));
    assert!(body.result.code.is_none());
}

#[tokio::test]
async fn test_health() {
    let app = build_app(&test_config("http://127.0.0.1:9"));

    let req = unauthenticated_request("GET", "/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: HealthResponse = response_json(resp).await;
    assert_eq!(body.status, "healthy");
}

#[tokio::test]
async fn test_unknown_api_route_is_json_404() {
    let app = build_app(&test_config("http://127.0.0.1:9"));

    let req = unauthenticated_request("GET", "/api/rooms")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: APIResponse<APIError> = response_json(resp).await;
    assert_eq!(body.result.code, "NOT_FOUND");
}
