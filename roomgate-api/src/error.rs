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

//! Application error type that implements Axum's `IntoResponse`.
//!
//! Every error is returned as `APIResponse<APIError>` with `success: false`,
//! paired with the appropriate HTTP status code. Component errors are mapped
//! here exactly once.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use roomgate_types::{APIError, APIResponse};

use crate::grant::GrantError;
use crate::oauth::AuthError;

/// Application-level error that pairs an HTTP status code with an [`APIError`].
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub body: APIError,
}

impl AppError {
    pub fn new(status: StatusCode, body: APIError) -> Self {
        Self { status, body }
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, APIError::unauthorized())
    }

    pub fn bad_request(detail: &str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, APIError::invalid_request(detail))
    }

    pub fn not_found(path: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, APIError::not_found(path))
    }

    /// Map a verification failure. `expose_detail` controls whether the
    /// underlying reason reaches the response body.
    pub fn from_auth(err: &AuthError, expose_detail: bool) -> Self {
        let detail = err.to_string();
        let detail = expose_detail.then_some(detail.as_str());
        match err {
            AuthError::Unavailable(_) => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                APIError::service_unavailable(detail),
            ),
            AuthError::Configuration(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                APIError::misconfigured(detail),
            ),
            AuthError::Unauthenticated => Self::unauthorized(),
            _ => match detail {
                Some(d) => Self::new(
                    StatusCode::UNAUTHORIZED,
                    APIError::unauthorized_with_detail(d),
                ),
                None => Self::unauthorized(),
            },
        }
    }

    /// Map an issuing failure. Argument errors always carry their message.
    pub fn from_grant(err: &GrantError, expose_detail: bool) -> Self {
        let detail = err.to_string();
        let exposed = expose_detail.then_some(detail.as_str());
        match err {
            GrantError::InvalidArgument(msg) => Self::bad_request(msg),
            GrantError::Configuration(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                APIError::misconfigured(exposed),
            ),
            GrantError::TokenGenerationFailed(_) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                APIError::token_generation_failed(exposed),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status;
        let body = APIResponse::error(self.body);
        let mut resp = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            resp.headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::RejectReason;
    use axum::body::Body;
    use http_body_util::BodyExt;

    /// Consume the response body and deserialize it to `APIResponse<APIError>`.
    async fn read_error_body(resp: Response) -> (StatusCode, APIResponse<APIError>) {
        let status = resp.status();
        let bytes = Body::new(resp.into_body())
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let parsed: APIResponse<APIError> =
            serde_json::from_slice(&bytes).expect("deserialize error body");
        (status, parsed)
    }

    fn invalid_credentials() -> AuthError {
        AuthError::InvalidCredentials {
            reason: RejectReason::AudienceMismatch,
            detail: "InvalidAudience".to_string(),
        }
    }

    #[tokio::test]
    async fn unauthorized_produces_401_with_challenge() {
        let resp = AppError::unauthorized().into_response();
        assert_eq!(
            resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
        let (status, body) = read_error_body(resp).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(!body.success);
        assert_eq!(body.result.code, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn rejections_map_to_401() {
        for err in [
            AuthError::Unauthenticated,
            AuthError::MalformedToken("bad header".into()),
            AuthError::KeyNotFound("kid".into()),
            invalid_credentials(),
        ] {
            let resp = AppError::from_auth(&err, true).into_response();
            let (status, body) = read_error_body(resp).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{err:?}");
            assert_eq!(body.result.code, "UNAUTHORIZED");
        }
    }

    #[tokio::test]
    async fn unavailable_maps_to_503() {
        let err = AuthError::Unavailable("JWKS fetch returned HTTP 500".into());
        let resp = AppError::from_auth(&err, true).into_response();
        let (status, body) = read_error_body(resp).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.result.code, "SERVICE_UNAVAILABLE");
        assert!(body
            .result
            .engineering_error
            .unwrap()
            .contains("HTTP 500"));
    }

    #[tokio::test]
    async fn configuration_maps_to_500() {
        let err = AuthError::Configuration("OIDC issuer URL is not set".into());
        let resp = AppError::from_auth(&err, false).into_response();
        let (status, body) = read_error_body(resp).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.result.code, "CONFIGURATION_ERROR");
        assert!(body.result.engineering_error.is_none());
    }

    #[tokio::test]
    async fn detail_hidden_when_not_exposed() {
        let resp = AppError::from_auth(&invalid_credentials(), true).into_response();
        let (_, shown) = read_error_body(resp).await;
        assert!(shown.result.engineering_error.is_some());

        let resp = AppError::from_auth(&invalid_credentials(), false).into_response();
        let (_, hidden) = read_error_body(resp).await;
        assert!(hidden.result.engineering_error.is_none());
    }

    #[tokio::test]
    async fn grant_errors_map_to_400_and_500() {
        let err = GrantError::InvalidArgument("room_name must not be empty".into());
        let resp = AppError::from_grant(&err, false).into_response();
        let (status, body) = read_error_body(resp).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.result.message.contains("room_name"));

        let (status, body) = read_error_body(
            AppError::from_grant(&GrantError::TokenGenerationFailed("boom".into()), true)
                .into_response(),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.result.code, "TOKEN_GENERATION_FAILED");
    }
}
