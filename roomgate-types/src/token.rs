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

//! Media room access token (JWT) claims.
//!
//! The token backend signs these claims with the media platform's API secret
//! (HMAC-SHA256); the media server validates the signature and admits the
//! participant into exactly the room named in the `video` grant. The layout
//! follows the LiveKit access token format.

use serde::{Deserialize, Serialize};

/// JWT payload for a room access token.
///
/// # Example payload
///
/// ```json
/// {
///   "iss": "APIxxxxxxxx",
///   "sub": "alice",
///   "name": "Alice",
///   "jti": "alice",
///   "nbf": 1707001200,
///   "exp": 1707022800,
///   "metadata": "",
///   "video": { "room": "studio", "roomJoin": true, "canPublish": true, "canSubscribe": true }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct RoomGrantClaims {
    /// API key the token was signed for.
    pub iss: String,

    /// Participant identity (unique within the room).
    pub sub: String,

    /// Display name shown to other participants.
    #[serde(default)]
    pub name: String,

    /// Token identifier. The media server uses it to correlate reconnects.
    #[serde(default)]
    pub jti: String,

    /// Not-before timestamp (Unix seconds).
    pub nbf: i64,

    /// Expiration timestamp (Unix seconds).
    pub exp: i64,

    /// Opaque participant metadata. Always empty.
    #[serde(default)]
    pub metadata: String,

    /// Room permissions.
    pub video: VideoGrant,
}

/// Per-room permission set carried in [`RoomGrantClaims::video`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    /// Room the grant applies to.
    pub room: String,
    #[serde(default)]
    pub room_join: bool,
    #[serde(default)]
    pub can_publish: bool,
    #[serde(default)]
    pub can_subscribe: bool,
}

impl VideoGrant {
    /// The only permission profile the backend issues: join, publish and
    /// subscribe on a single room.
    pub fn participant(room: &str) -> Self {
        Self {
            room: room.to_string(),
            room_join: true,
            can_publish: true,
            can_subscribe: true,
        }
    }
}
