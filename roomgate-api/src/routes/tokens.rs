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

//! Handler for `POST /api/tokens`.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use roomgate_types::{
    requests::{TokenRequest, MAX_PARTICIPANT_NAME_LEN},
    responses::{APIResponse, TokenResponse},
};

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::grant::GrantRequest;
use crate::state::AppState;

/// POST /api/tokens
///
/// Issue a room token for the authenticated caller. The identity comes from
/// the verified claims; the display name is the requested one, else the
/// caller's profile name clipped to the participant name limit.
pub async fn create_token(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<APIResponse<TokenResponse>>, AppError> {
    let Json(body) = body.map_err(|rejection| AppError::bad_request(&rejection.body_text()))?;

    let participant_name = match body.participant_name.filter(|n| !n.trim().is_empty()) {
        Some(name) if name.trim().chars().count() > MAX_PARTICIPANT_NAME_LEN => {
            return Err(AppError::bad_request(&format!(
                "participant_name must be at most {MAX_PARTICIPANT_NAME_LEN} characters"
            )));
        }
        Some(name) => name,
        // Profile names are clipped, not rejected.
        None => claims
            .display_name()
            .chars()
            .take(MAX_PARTICIPANT_NAME_LEN)
            .collect(),
    };

    let request = GrantRequest {
        room_name: body.room_name,
        participant_identity: claims.participant_identity().to_string(),
        participant_name: Some(participant_name),
    };

    let grant = state
        .issuer
        .issue(&request)
        .map_err(|err| AppError::from_grant(&err, state.expose_error_detail))?;

    tracing::info!(
        room = %request.room_name,
        identity = %request.participant_identity,
        "room token issued"
    );

    Ok(Json(APIResponse::ok(TokenResponse {
        token: grant.token,
        url: grant.url,
    })))
}
