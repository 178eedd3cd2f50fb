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

//! Media room access token generation.
//!
//! Tokens follow the LiveKit access token format: an HS256 JWT signed with
//! the API secret, `iss` set to the API key, and a `video` grant naming the
//! room. The media server validates the signature and enforces the grant.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use roomgate_types::requests::{MAX_PARTICIPANT_NAME_LEN, MAX_ROOM_NAME_LEN};
use roomgate_types::{RoomGrantClaims, VideoGrant};
use thiserror::Error;

use crate::config::LiveKitConfig;

/// Errors produced while issuing a room token.
#[derive(Debug, Error)]
pub enum GrantError {
    #[error("grant issuer misconfigured: {0}")]
    Configuration(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("failed to generate token: {0}")]
    TokenGenerationFailed(String),
}

/// Inputs for one room token.
#[derive(Debug, Clone)]
pub struct GrantRequest {
    pub room_name: String,
    pub participant_identity: String,
    pub participant_name: Option<String>,
}

/// A signed room token and the media server URL it is valid for.
#[derive(Debug, Clone)]
pub struct IssuedGrant {
    pub token: String,
    pub url: String,
}

/// Turns finished claims into a signed token string.
pub trait GrantSigner: Send + Sync {
    fn sign(
        &self,
        claims: &RoomGrantClaims,
        secret: &str,
    ) -> Result<String, jsonwebtoken::errors::Error>;
}

/// HMAC-SHA256 signer used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hs256Signer;

impl GrantSigner for Hs256Signer {
    fn sign(
        &self,
        claims: &RoomGrantClaims,
        secret: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }
}

/// Issues join/publish/subscribe tokens for a single room.
pub struct GrantIssuer<S = Hs256Signer> {
    api_key: Option<String>,
    api_secret: Option<String>,
    url: String,
    ttl_secs: i64,
    signer: S,
}

impl GrantIssuer<Hs256Signer> {
    pub fn new(config: &LiveKitConfig) -> Self {
        Self::with_signer(config, Hs256Signer)
    }
}

impl<S: GrantSigner> GrantIssuer<S> {
    pub fn with_signer(config: &LiveKitConfig, signer: S) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            url: config.url.clone(),
            ttl_secs: config.grant_ttl_secs,
            signer,
        }
    }

    /// Sign a room token for the given participant.
    ///
    /// The display name defaults to the identity when absent or blank.
    pub fn issue(&self, request: &GrantRequest) -> Result<IssuedGrant, GrantError> {
        let (api_key, api_secret) = match (self.api_key.as_deref(), self.api_secret.as_deref()) {
            (Some(key), Some(secret)) => (key, secret),
            (None, _) => {
                return Err(GrantError::Configuration(
                    "LIVEKIT_API_KEY is not set".to_string(),
                ))
            }
            (_, None) => {
                return Err(GrantError::Configuration(
                    "LIVEKIT_API_SECRET is not set".to_string(),
                ))
            }
        };

        let room = request.room_name.trim();
        if room.is_empty() {
            return Err(GrantError::InvalidArgument(
                "room_name must not be empty".to_string(),
            ));
        }
        if room.chars().count() > MAX_ROOM_NAME_LEN {
            return Err(GrantError::InvalidArgument(format!(
                "room_name must be at most {MAX_ROOM_NAME_LEN} characters"
            )));
        }

        let identity = request.participant_identity.trim();
        if identity.is_empty() {
            return Err(GrantError::InvalidArgument(
                "participant_identity must not be empty".to_string(),
            ));
        }

        let name = request
            .participant_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        if name.is_some_and(|n| n.chars().count() > MAX_PARTICIPANT_NAME_LEN) {
            return Err(GrantError::InvalidArgument(format!(
                "participant_name must be at most {MAX_PARTICIPANT_NAME_LEN} characters"
            )));
        }

        let now = Utc::now().timestamp();
        let exp = now.checked_add(self.ttl_secs).ok_or_else(|| {
            GrantError::TokenGenerationFailed(format!(
                "token lifetime of {}s overflows the expiry timestamp",
                self.ttl_secs
            ))
        })?;
        let claims = RoomGrantClaims {
            iss: api_key.to_string(),
            sub: identity.to_string(),
            name: name.unwrap_or(identity).to_string(),
            jti: identity.to_string(),
            nbf: now,
            exp,
            metadata: String::new(),
            video: VideoGrant::participant(room),
        };

        let token = self.signer.sign(&claims, api_secret).map_err(|e| {
            tracing::error!("Failed to sign room token: {e}");
            GrantError::TokenGenerationFailed(e.to_string())
        })?;

        tracing::debug!(room, identity, "issued room token");
        Ok(IssuedGrant {
            token,
            url: self.url.clone(),
        })
    }
}

/// Decode and validate a room token with the API secret that signed it.
pub fn decode_grant(
    token: &str,
    api_secret: &str,
) -> Result<RoomGrantClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_required_spec_claims(&["exp", "nbf", "sub", "iss"]);
    validation.validate_nbf = true;
    decode::<RoomGrantClaims>(
        token,
        &DecodingKey::from_secret(api_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}
