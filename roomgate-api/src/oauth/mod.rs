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

//! OIDC bearer-token verification: key set resolution, RSA key
//! reconstruction, and claim validation.

pub mod claims;
pub mod error;
pub mod jwks;
pub mod verify;

pub use claims::ClaimsSet;
pub use error::{AuthError, RejectReason};
pub use jwks::{JwkEntry, KeyResolver, SigningKey, VerificationKey};
pub use verify::TokenVerifier;
