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

//! Shared application state passed to every Axum handler via `State`.

use std::sync::Arc;

use crate::config::Config;
use crate::grant::GrantIssuer;
use crate::oauth::{AuthError, TokenVerifier};

/// Application state shared across all request handlers.
///
/// Built once from [`Config`]; nothing in it is mutated afterwards except the
/// key set cache owned by the verifier's resolver.
#[derive(Clone)]
pub struct AppState {
    /// Bearer token verifier (owns the JWKS resolver and its cache).
    pub verifier: Arc<TokenVerifier>,
    /// Room token issuer.
    pub issuer: Arc<GrantIssuer>,
    /// Whether error responses carry `engineering_error` detail.
    pub expose_error_detail: bool,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, AuthError> {
        Ok(Self {
            verifier: Arc::new(TokenVerifier::new(&config.oidc, config.require_auth)?),
            issuer: Arc::new(GrantIssuer::new(&config.livekit)),
            expose_error_detail: config.expose_error_detail,
        })
    }
}
