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

//! Request types for the roomgate REST API.
//!
//! These types define the shape of request bodies and query parameters.
//! They are used by both the server (for deserialization) and clients
//! (for serialization).

use serde::{Deserialize, Serialize};

/// Maximum length (in characters) of a room name.
pub const MAX_ROOM_NAME_LEN: usize = 200;

/// Maximum length (in characters) of a participant display name.
pub const MAX_PARTICIPANT_NAME_LEN: usize = 200;

/// Request body for `POST /api/tokens`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenRequest {
    /// Room to join (1-200 characters).
    pub room_name: String,

    /// Display name override (max 200 characters). Falls back to the
    /// caller's identity-provider profile when omitted.
    #[serde(default)]
    pub participant_name: Option<String>,
}

/// Query parameters for `GET /api/auth/callback`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}
