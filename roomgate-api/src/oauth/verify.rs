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

//! Bearer token verification against the issuer's key set.

use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use crate::config::OidcConfig;

use super::claims::ClaimsSet;
use super::error::AuthError;
use super::jwks::KeyResolver;

/// Validates identity tokens: `kid` lookup, signature, audience, issuer, expiry.
pub struct TokenVerifier {
    require_auth: bool,
    audience: Option<String>,
    issuer: Option<String>,
    algorithm: Algorithm,
    resolver: KeyResolver,
}

impl TokenVerifier {
    pub fn new(config: &OidcConfig, require_auth: bool) -> Result<Self, AuthError> {
        Ok(Self::with_resolver(
            config,
            require_auth,
            KeyResolver::new(config)?,
        ))
    }

    pub fn with_resolver(config: &OidcConfig, require_auth: bool, resolver: KeyResolver) -> Self {
        Self {
            require_auth,
            audience: config.client_id.clone(),
            issuer: config.expected_issuer().map(str::to_string),
            algorithm: config.algorithm,
            resolver,
        }
    }

    /// Verify an optional bearer credential and return its claims.
    ///
    /// With authentication disabled the credential is ignored and
    /// [`ClaimsSet::mock`] is returned.
    pub async fn verify(&self, credential: Option<&str>) -> Result<ClaimsSet, AuthError> {
        if !self.require_auth {
            return Ok(ClaimsSet::mock());
        }

        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::Unauthenticated)?;

        let result = self.verify_token(token).await;
        match &result {
            Ok(claims) => tracing::debug!(sub = %claims.sub, "bearer token verified"),
            Err(AuthError::InvalidCredentials { reason, detail }) => {
                tracing::warn!(reason = %reason, "bearer token rejected: {detail}")
            }
            Err(err) if err.is_rejection() => {
                tracing::warn!(kind = err.kind(), "bearer token rejected: {err}")
            }
            Err(err) => tracing::error!(kind = err.kind(), "bearer token not verified: {err}"),
        }
        result
    }

    async fn verify_token(&self, token: &str) -> Result<ClaimsSet, AuthError> {
        let header = decode_header(token)
            .map_err(|e| AuthError::MalformedToken(format!("invalid JWT header: {e}")))?;

        let kid = header
            .kid
            .as_deref()
            .ok_or_else(|| AuthError::MalformedToken("JWT header missing kid".to_string()))?;

        let audience = self
            .audience
            .as_deref()
            .ok_or_else(|| AuthError::Configuration("OIDC client id is not set".to_string()))?;
        let issuer = self
            .issuer
            .as_deref()
            .ok_or_else(|| AuthError::Configuration("expected issuer is not set".to_string()))?;

        let key = self.resolver.resolve(kid).await?;

        let mut validation = Validation::new(self.algorithm);
        validation.set_audience(&[audience]);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_exp = true;

        let data = decode::<ClaimsSet>(token, &key.decoding_key, &validation)?;
        Ok(data.claims)
    }
}
