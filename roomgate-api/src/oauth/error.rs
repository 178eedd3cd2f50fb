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

//! Failure kinds of the bearer-token verification path.

use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

/// Why a structurally valid token was rejected during claim validation.
///
/// Only used for logging; every variant reaches the caller as the same
/// [`AuthError::InvalidCredentials`] kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    BadSignature,
    AlgorithmMismatch,
    AudienceMismatch,
    IssuerMismatch,
    Expired,
    NotYetValid,
    MissingClaim,
    Other,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::BadSignature => "bad_signature",
            RejectReason::AlgorithmMismatch => "algorithm_mismatch",
            RejectReason::AudienceMismatch => "audience_mismatch",
            RejectReason::IssuerMismatch => "issuer_mismatch",
            RejectReason::Expired => "expired",
            RejectReason::NotYetValid => "not_yet_valid",
            RejectReason::MissingClaim => "missing_claim",
            RejectReason::Other => "other",
        }
    }
}

impl From<&ErrorKind> for RejectReason {
    fn from(kind: &ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidSignature => RejectReason::BadSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::MissingAlgorithm => {
                RejectReason::AlgorithmMismatch
            }
            ErrorKind::InvalidAudience => RejectReason::AudienceMismatch,
            ErrorKind::InvalidIssuer => RejectReason::IssuerMismatch,
            ErrorKind::ExpiredSignature => RejectReason::Expired,
            ErrorKind::ImmatureSignature => RejectReason::NotYetValid,
            ErrorKind::MissingRequiredClaim(_) => RejectReason::MissingClaim,
            _ => RejectReason::Other,
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by the key resolver and token verifier.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer credential was presented.
    #[error("authentication required")]
    Unauthenticated,

    /// The token header could not be parsed or carries no `kid`.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// No key in the published key set has the token's `kid`.
    #[error("unable to find signing key '{0}'")]
    KeyNotFound(String),

    /// The matching key set entry could not be turned into an RSA public key.
    #[error("signing key '{kid}' is unusable: {detail}")]
    MalformedKey { kid: String, detail: String },

    /// Signature, algorithm, audience, issuer or expiry check failed.
    #[error("invalid authentication credentials: {detail}")]
    InvalidCredentials { reason: RejectReason, detail: String },

    /// The key set could not be fetched (network error, timeout, non-success status).
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),

    /// A setting required for verification is missing.
    #[error("authentication misconfigured: {0}")]
    Configuration(String),
}

impl AuthError {
    /// `true` for every kind the caller sees as "authentication rejected".
    pub fn is_rejection(&self) -> bool {
        !matches!(self, AuthError::Unavailable(_) | AuthError::Configuration(_))
    }

    /// Short tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Unauthenticated => "unauthenticated",
            AuthError::MalformedToken(_) => "malformed_token",
            AuthError::KeyNotFound(_) => "key_not_found",
            AuthError::MalformedKey { .. } => "malformed_key",
            AuthError::InvalidCredentials { .. } => "invalid_credentials",
            AuthError::Unavailable(_) => "unavailable",
            AuthError::Configuration(_) => "configuration",
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AuthError::InvalidCredentials {
            reason: RejectReason::from(err.kind()),
            detail: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_infrastructure_failures_are_not_rejections() {
        assert!(AuthError::Unauthenticated.is_rejection());
        assert!(AuthError::KeyNotFound("k".into()).is_rejection());
        assert!(AuthError::MalformedToken("x".into()).is_rejection());
        assert!(!AuthError::Unavailable("down".into()).is_rejection());
        assert!(!AuthError::Configuration("no issuer".into()).is_rejection());
    }

    #[test]
    fn jwt_error_kinds_map_to_reject_reasons() {
        let err: AuthError = jsonwebtoken::errors::Error::from(ErrorKind::ExpiredSignature).into();
        match err {
            AuthError::InvalidCredentials { reason, .. } => {
                assert_eq!(reason, RejectReason::Expired)
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            RejectReason::from(&ErrorKind::InvalidAudience),
            RejectReason::AudienceMismatch
        );
        assert_eq!(
            RejectReason::from(&ErrorKind::InvalidToken),
            RejectReason::Other
        );
    }
}
