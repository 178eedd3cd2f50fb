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

//! Axum extractor that verifies the `Authorization: Bearer` credential.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::error::AppError;
use crate::oauth::ClaimsSet;
use crate::state::AppState;

/// Extractor that resolves the caller's verified identity claims.
///
/// Usage in a handler:
/// ```ignore
/// async fn my_handler(AuthUser(claims): AuthUser) { ... }
/// ```
#[derive(Debug)]
pub struct AuthUser(pub ClaimsSet);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let credential = bearer_token(parts);
        state
            .verifier
            .verify(credential)
            .await
            .map(AuthUser)
            .map_err(|err| AppError::from_auth(&err, state.expose_error_detail))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
/// The scheme is matched case-insensitively.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .trim();
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then_some(token.trim())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(auth_header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test").method("GET");
        if let Some(val) = auth_header {
            builder = builder.header(header::AUTHORIZATION, val);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn bearer_token_extracted() {
        let parts = parts_with(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let parts = parts_with(Some("bearer   tok"));
        assert_eq!(bearer_token(&parts), Some("tok"));
    }

    #[test]
    fn missing_header_yields_none() {
        assert_eq!(bearer_token(&parts_with(None)), None);
    }

    #[test]
    fn other_schemes_and_empty_tokens_ignored() {
        assert_eq!(bearer_token(&parts_with(Some("Basic dXNlcjpwdw=="))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer"))), None);
    }
}
