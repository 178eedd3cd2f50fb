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

//! Identity endpoints: profile of the verified caller and the OAuth callback
//! placeholder.

use axum::{extract::Query, Json};
use roomgate_types::{
    requests::CallbackQuery,
    responses::{APIResponse, CallbackResponse, ProfileResponse},
};

use crate::auth::AuthUser;

/// GET /api/auth/me
pub async fn me(AuthUser(claims): AuthUser) -> Json<APIResponse<ProfileResponse>> {
    Json(APIResponse::ok(ProfileResponse {
        sub: claims.sub,
        preferred_username: claims.preferred_username,
        name: claims.name,
    }))
}

/// GET /api/auth/callback?code=...&state=...
///
/// The browser runs the PKCE flow itself, so no code exchange happens here;
/// the handler acknowledges what it received.
pub async fn callback(Query(query): Query<CallbackQuery>) -> Json<APIResponse<CallbackResponse>> {
    if let Some(error) = query.error {
        tracing::warn!("OAuth callback reported error: {error}");
        return Json(APIResponse::ok(CallbackResponse {
            message: None,
            code: None,
            state: None,
            error: Some(error),
        }));
    }

    Json(APIResponse::ok(CallbackResponse {
        message: Some("OAuth callback received".to_string()),
        code: query.code,
        state: query.state,
        error: None,
    }))
}
