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

//! Response types for the roomgate REST API.
//!
//! Every JSON endpoint under `/api` returns an [`APIResponse<T>`] envelope:
//! - On success: `{ "success": true,  "result": <T> }`
//! - On failure: `{ "success": false, "result": <APIError> }`

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Generic envelope
// ---------------------------------------------------------------------------

/// Top-level API response envelope.
///
/// # Success example
///
/// ```json
/// { "success": true, "result": { "token": "eyJ...", "url": "wss://media.example.com" } }
/// ```
///
/// # Error example
///
/// ```json
/// { "success": false, "result": { "code": "UNAUTHORIZED", "message": "..." } }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct APIResponse<A: Serialize> {
    pub success: bool,
    pub result: A,
}

impl<A: Serialize> APIResponse<A> {
    /// Wrap a successful result.
    pub fn ok(result: A) -> Self {
        Self {
            success: true,
            result,
        }
    }
}

impl APIResponse<crate::error::APIError> {
    /// Wrap an error result.
    pub fn error(err: crate::error::APIError) -> Self {
        Self {
            success: false,
            result: err,
        }
    }
}

// ---------------------------------------------------------------------------
// Endpoint-specific response payloads
// ---------------------------------------------------------------------------

/// Response payload for `POST /api/tokens`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenResponse {
    /// Signed media-server access token.
    pub token: String,
    /// Media server connection URL the client should dial with `token`.
    pub url: String,
}

/// Response payload for `GET /api/auth/me`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProfileResponse {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Response payload for `GET /api/auth/callback`.
///
/// The callback does not exchange the code; the browser completes the PKCE
/// flow itself. The endpoint only echoes what it received.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CallbackResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response payload for `GET /health`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HealthResponse {
    pub status: String,
}

/// Response payload for `GET /` when no frontend bundle is served.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServiceInfoResponse {
    pub message: String,
    pub version: String,
}
