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

//! API error types.
//!
//! Every failed API response is returned as `APIResponse<APIError>` with `success: false`.

use serde::{Deserialize, Serialize};

/// Structured error returned in the `result` field of a failed [`super::APIResponse`].
///
/// The `code` field is a machine-readable identifier (e.g. `"UNAUTHORIZED"`).
/// The `message` field is a human-readable description suitable for display.
/// The `engineering_error` field carries the underlying reason (which claim
/// check failed, what the JWKS endpoint returned). The server only fills it
/// when detail exposure is enabled.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct APIError {
    /// Machine-readable error code (e.g. `"UNAUTHORIZED"`, `"INVALID_REQUEST"`).
    pub code: String,

    /// Human-readable error message.
    pub message: String,

    /// Optional engineering-level detail for debugging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engineering_error: Option<String>,
}

impl APIError {
    fn new(code: &str, message: impl Into<String>, detail: Option<&str>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            engineering_error: detail.map(str::to_string),
        }
    }

    pub fn unauthorized() -> Self {
        Self::new("UNAUTHORIZED", "Authentication required.", None)
    }

    pub fn unauthorized_with_detail(detail: &str) -> Self {
        Self::new(
            "UNAUTHORIZED",
            "Invalid authentication credentials.",
            Some(detail),
        )
    }

    pub fn service_unavailable(detail: Option<&str>) -> Self {
        Self::new(
            "SERVICE_UNAVAILABLE",
            "Identity provider is temporarily unavailable.",
            detail,
        )
    }

    pub fn invalid_request(detail: &str) -> Self {
        Self::new("INVALID_REQUEST", format!("Invalid request: {detail}"), None)
    }

    pub fn token_generation_failed(detail: Option<&str>) -> Self {
        Self::new(
            "TOKEN_GENERATION_FAILED",
            "Failed to generate token",
            detail,
        )
    }

    pub fn misconfigured(detail: Option<&str>) -> Self {
        Self::new(
            "CONFIGURATION_ERROR",
            "Server is not configured for this operation",
            detail,
        )
    }

    pub fn not_found(path: &str) -> Self {
        Self::new("NOT_FOUND", format!("No route for '{path}'"), None)
    }
}

impl std::fmt::Display for APIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for APIError {}
