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

//! Key resolution: fetch the issuer's JWKS, pick the key by `kid`, and rebuild
//! the RSA public key from its modulus and exponent.
//!
//! Fetched key sets are kept for `jwks_cache_ttl`. A `kid` missing from a
//! fresh key set triggers one refetch, rate-limited by `jwks_min_refresh`.
//! With a zero TTL every resolution fetches.

use std::time::{Duration, Instant};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::DecodingKey;
use rsa::{BigUint, RsaPublicKey};
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};

use crate::config::OidcConfig;

use super::error::AuthError;

/// One entry of the `keys` array. Only the RSA fields are read.
#[derive(Debug, Clone, Deserialize)]
pub struct JwkEntry {
    #[serde(default)]
    pub kid: Option<String>,
    pub kty: String,
    #[serde(default, rename = "use")]
    pub usage: Option<String>,
    #[serde(default)]
    pub n: Option<String>,
    #[serde(default)]
    pub e: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwksDocument {
    keys: Vec<JwkEntry>,
}

/// An RSA signing key from the identity provider's key set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKey {
    pub key_id: String,
    pub key_type: String,
    pub usage: Option<String>,
    pub modulus: BigUint,
    pub exponent: BigUint,
}

impl SigningKey {
    /// Decode `n` and `e` as big-endian unsigned integers.
    pub fn from_jwk(jwk: &JwkEntry) -> Result<Self, AuthError> {
        let kid = jwk.kid.clone().unwrap_or_default();
        let malformed = |detail: String| AuthError::MalformedKey {
            kid: kid.clone(),
            detail,
        };

        if jwk.kty != "RSA" {
            return Err(malformed(format!("unsupported key type '{}'", jwk.kty)));
        }
        let n = jwk
            .n
            .as_deref()
            .ok_or_else(|| malformed("missing modulus".to_string()))?;
        let e = jwk
            .e
            .as_deref()
            .ok_or_else(|| malformed("missing exponent".to_string()))?;

        let modulus = decode_biguint(n).map_err(|err| malformed(format!("modulus: {err}")))?;
        let exponent = decode_biguint(e).map_err(|err| malformed(format!("exponent: {err}")))?;

        Ok(Self {
            key_id: kid.clone(),
            key_type: jwk.kty.clone(),
            usage: jwk.usage.clone(),
            modulus,
            exponent,
        })
    }

    /// Build the RSA public key value. Rejects out-of-range exponents and
    /// oversized moduli.
    pub fn public_key(&self) -> Result<RsaPublicKey, AuthError> {
        RsaPublicKey::new(self.modulus.clone(), self.exponent.clone()).map_err(|err| {
            AuthError::MalformedKey {
                kid: self.key_id.clone(),
                detail: err.to_string(),
            }
        })
    }

    /// Minimal big-endian bytes: leading zero octets some providers emit are dropped,
    /// which the signature backend requires.
    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_rsa_raw_components(
            &self.modulus.to_bytes_be(),
            &self.exponent.to_bytes_be(),
        )
    }
}

/// A resolved key ready for signature verification.
#[derive(Clone)]
pub struct VerificationKey {
    pub key: SigningKey,
    pub public_key: RsaPublicKey,
    pub decoding_key: DecodingKey,
}

impl VerificationKey {
    pub fn new(key: SigningKey) -> Result<Self, AuthError> {
        let public_key = key.public_key()?;
        let decoding_key = key.decoding_key();
        Ok(Self {
            key,
            public_key,
            decoding_key,
        })
    }
}

impl std::fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationKey")
            .field("key_id", &self.key.key_id)
            .finish_non_exhaustive()
    }
}

/// Decode unpadded base64url into an unsigned integer. Trailing `=` is tolerated.
fn decode_biguint(value: &str) -> Result<BigUint, String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(value.trim_end_matches('='))
        .map_err(|e| format!("invalid base64url: {e}"))?;
    if bytes.is_empty() {
        return Err("empty value".to_string());
    }
    Ok(BigUint::from_bytes_be(&bytes))
}

/// Return the first entry whose `kid` equals `kid` exactly.
pub fn select_key<'a>(keys: &'a [JwkEntry], kid: &str) -> Option<&'a JwkEntry> {
    keys.iter().find(|jwk| jwk.kid.as_deref() == Some(kid))
}

struct CachedKeySet {
    keys: Vec<JwkEntry>,
    fetched_at: Instant,
}

enum CacheLookup {
    Found(JwkEntry),
    /// Fresh key set without the `kid`, fetched too recently to try again.
    RateLimited,
    /// Fresh key set without the `kid`; a refetch is allowed.
    Missing,
    /// No key set, or it is older than the TTL.
    Expired,
}

/// Fetches and caches the issuer's key set.
pub struct KeyResolver {
    jwks_url: Option<String>,
    http: reqwest::Client,
    cache_ttl: Duration,
    min_refresh: Duration,
    cache: RwLock<Option<CachedKeySet>>,
    /// Held for the duration of a fetch so concurrent misses share one request.
    refresh_lock: Mutex<()>,
}

impl KeyResolver {
    pub fn new(config: &OidcConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(config.jwks_timeout)
            .build()
            .map_err(|e| AuthError::Configuration(format!("HTTP client setup failed: {e}")))?;

        Ok(Self {
            jwks_url: config.jwks_url(),
            http,
            cache_ttl: config.jwks_cache_ttl,
            min_refresh: config.jwks_min_refresh,
            cache: RwLock::new(None),
            refresh_lock: Mutex::new(()),
        })
    }

    /// Create a test-only resolver with a pre-loaded key set that is never refetched.
    #[cfg(test)]
    pub fn with_keys(keys: Vec<JwkEntry>) -> Self {
        let forever = Duration::from_secs(365 * 24 * 60 * 60);
        Self {
            jwks_url: Some("http://127.0.0.1:9/.well-known/jwks.json".to_string()),
            http: reqwest::Client::new(),
            cache_ttl: forever,
            min_refresh: forever,
            cache: RwLock::new(Some(CachedKeySet {
                keys,
                fetched_at: Instant::now(),
            })),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Resolve the verification key for `kid`.
    pub async fn resolve(&self, kid: &str) -> Result<VerificationKey, AuthError> {
        let url = self
            .jwks_url
            .as_deref()
            .ok_or_else(|| AuthError::Configuration("OIDC issuer URL is not set".to_string()))?;

        if self.cache_ttl.is_zero() {
            let keys = self.fetch(url).await?;
            return Self::key_from(&keys, kid);
        }

        match self.lookup(kid).await {
            CacheLookup::Found(jwk) => return VerificationKey::new(SigningKey::from_jwk(&jwk)?),
            CacheLookup::RateLimited => return Err(AuthError::KeyNotFound(kid.to_string())),
            CacheLookup::Missing | CacheLookup::Expired => {}
        }

        let _refresh = self.refresh_lock.lock().await;

        // Another task may have refreshed the key set while this one waited.
        match self.lookup(kid).await {
            CacheLookup::Found(jwk) => return VerificationKey::new(SigningKey::from_jwk(&jwk)?),
            CacheLookup::RateLimited => {
                tracing::debug!(kid, "kid not in cached key set, refresh rate-limited");
                return Err(AuthError::KeyNotFound(kid.to_string()));
            }
            CacheLookup::Missing => {
                tracing::debug!(kid, "kid not in cached key set, refetching");
                self.invalidate().await;
            }
            CacheLookup::Expired => {}
        }

        let keys = self.fetch(url).await?;
        let result = Self::key_from(&keys, kid);
        *self.cache.write().await = Some(CachedKeySet {
            keys,
            fetched_at: Instant::now(),
        });
        result
    }

    async fn lookup(&self, kid: &str) -> CacheLookup {
        let cache = self.cache.read().await;
        let Some(cached) = cache.as_ref() else {
            return CacheLookup::Expired;
        };
        let age = cached.fetched_at.elapsed();
        if age >= self.cache_ttl {
            return CacheLookup::Expired;
        }
        match select_key(&cached.keys, kid) {
            Some(jwk) => CacheLookup::Found(jwk.clone()),
            None if age < self.min_refresh => CacheLookup::RateLimited,
            None => CacheLookup::Missing,
        }
    }

    fn key_from(keys: &[JwkEntry], kid: &str) -> Result<VerificationKey, AuthError> {
        let jwk = select_key(keys, kid).ok_or_else(|| AuthError::KeyNotFound(kid.to_string()))?;
        VerificationKey::new(SigningKey::from_jwk(jwk)?)
    }

    /// Drop the cached key set so the next resolution fetches.
    async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    async fn fetch(&self, url: &str) -> Result<Vec<JwkEntry>, AuthError> {
        let resp = self.http.get(url).send().await.map_err(|e| {
            let what = if e.is_timeout() { "timed out" } else { "failed" };
            tracing::error!("JWKS fetch from {url} {what}: {e}");
            AuthError::Unavailable(format!("JWKS fetch {what}: {e}"))
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            tracing::error!("JWKS fetch from {url} returned HTTP {status}");
            return Err(AuthError::Unavailable(format!(
                "JWKS fetch returned HTTP {status}"
            )));
        }

        let doc: JwksDocument = resp.json().await.map_err(|e| {
            tracing::error!("Failed to parse JWKS from {url}: {e}");
            AuthError::Unavailable(format!("Failed to parse JWKS: {e}"))
        })?;

        tracing::debug!(count = doc.keys.len(), "fetched JWKS");
        Ok(doc.keys)
    }
}
