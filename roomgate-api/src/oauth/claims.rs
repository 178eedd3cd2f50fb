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

//! Verified identity token claims.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims of a verified identity token.
///
/// Standard and profile claims are typed; everything else the provider sends
/// is kept in [`ClaimsSet::extra`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ClaimsSet {
    /// Subject identifier.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Single string or array; the verifier has already matched it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<Value>,
    /// Expiration time (Unix timestamp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClaimsSet {
    pub const MOCK_SUBJECT: &'static str = "mock-user";

    /// Synthetic identity used when authentication is disabled.
    pub fn mock() -> Self {
        Self {
            sub: Self::MOCK_SUBJECT.to_string(),
            preferred_username: Some(Self::MOCK_SUBJECT.to_string()),
            name: Some("Mock User".to_string()),
            iss: None,
            aud: None,
            exp: None,
            extra: Map::new(),
        }
    }

    /// Participant identity: `sub`, then `preferred_username`, then `"unknown"`.
    pub fn participant_identity(&self) -> &str {
        non_empty(Some(&self.sub))
            .or_else(|| non_empty(self.preferred_username.as_ref()))
            .unwrap_or("unknown")
    }

    /// Display name: `name`, then `preferred_username`, then the identity.
    pub fn display_name(&self) -> &str {
        non_empty(self.name.as_ref())
            .or_else(|| non_empty(self.preferred_username.as_ref()))
            .unwrap_or_else(|| self.participant_identity())
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}
