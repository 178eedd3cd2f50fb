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

//! Application configuration loaded from environment variables.
//!
//! Configuration is read once at startup and then shared immutably. Settings
//! that are only needed by one operation (OIDC issuer, LiveKit credentials)
//! are optional here; their absence surfaces as a configuration error when
//! that operation is attempted.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;

/// Default LiveKit grant lifetime: 6 hours.
pub const DEFAULT_GRANT_TTL_SECS: i64 = 6 * 60 * 60;

/// Upper bound for `GRANT_TTL_SECS` (30 days).
pub const MAX_GRANT_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// Configuration for the roomgate API.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server (e.g. "0.0.0.0:8000").
    pub listen_addr: String,
    /// When `false`, every request is treated as the fixed mock user.
    /// Disables all access control; never the default.
    pub require_auth: bool,
    /// Identity provider settings.
    pub oidc: OidcConfig,
    /// Media platform settings.
    pub livekit: LiveKitConfig,
    /// Allowed CORS origins. A single `"*"` allows any origin.
    pub cors_origins: Vec<String>,
    /// Directory holding a built frontend bundle to serve at `/`.
    pub static_dir: Option<PathBuf>,
    /// Include underlying error detail in `engineering_error` of error responses.
    pub expose_error_detail: bool,
}

/// OIDC identity provider configuration.
#[derive(Debug, Clone)]
pub struct OidcConfig {
    /// Issuer base URL; the key set is fetched from `{issuer_url}/.well-known/jwks.json`.
    pub issuer_url: Option<String>,
    /// Expected `aud` claim (the OAuth client id).
    pub client_id: Option<String>,
    /// Expected `iss` claim. Defaults to `issuer_url` when unset.
    pub expected_issuer: Option<String>,
    /// Signature algorithm identity tokens must use.
    pub algorithm: Algorithm,
    /// Timeout for a single key set fetch.
    pub jwks_timeout: Duration,
    /// How long a fetched key set is reused. Zero disables caching.
    pub jwks_cache_ttl: Duration,
    /// Minimum spacing between refetches triggered by an unknown `kid`.
    pub jwks_min_refresh: Duration,
}

/// LiveKit (media platform) configuration.
#[derive(Debug, Clone)]
pub struct LiveKitConfig {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    /// Public media server URL returned to clients alongside each token.
    pub url: String,
    /// Lifetime of issued room tokens in seconds.
    pub grant_ttl_secs: i64,
}

impl OidcConfig {
    /// The issuer value tokens must carry.
    pub fn expected_issuer(&self) -> Option<&str> {
        self.expected_issuer
            .as_deref()
            .or(self.issuer_url.as_deref())
    }

    /// Key set URL derived from the issuer base URL.
    pub fn jwks_url(&self) -> Option<String> {
        self.issuer_url
            .as_deref()
            .map(|base| format!("{}/.well-known/jwks.json", base.trim_end_matches('/')))
    }
}

impl Default for OidcConfig {
    fn default() -> Self {
        Self {
            issuer_url: None,
            client_id: None,
            expected_issuer: None,
            algorithm: Algorithm::RS256,
            jwks_timeout: Duration::from_secs(10),
            jwks_cache_ttl: Duration::from_secs(300),
            jwks_min_refresh: Duration::from_secs(10),
        }
    }
}

impl Default for LiveKitConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            url: "wss://your-livekit-server.com".to_string(),
            grant_ttl_secs: DEFAULT_GRANT_TTL_SECS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Optional (with defaults)
    /// - `LISTEN_ADDR` (default: `"0.0.0.0:8000"`)
    /// - `REQUIRE_AUTH` (default: `true`)
    /// - `OIDC_ISSUER_URL`, `OIDC_CLIENT_ID`, `OIDC_EXPECTED_ISSUER`
    /// - `JWT_ALGORITHM` (default: `"RS256"`)
    /// - `JWKS_TIMEOUT_SECS` (default: `10`), `JWKS_CACHE_TTL_SECS` (default: `300`),
    ///   `JWKS_MIN_REFRESH_SECS` (default: `10`)
    /// - `LIVEKIT_API_KEY`, `LIVEKIT_API_SECRET`, `LIVEKIT_URL`
    /// - `GRANT_TTL_SECS` (default: `21600`)
    /// - `CORS_ORIGINS` (default: `"http://localhost:5173,http://localhost:3000"`)
    /// - `STATIC_DIR`
    /// - `EXPOSE_ERROR_DETAIL` (default: `true`)
    ///
    /// `ZITADEL_ISSUER_URL`, `ZITADEL_CLIENT_ID` and `LIVEKIT_SERVER_URL` are
    /// read when the corresponding new name is unset.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let listen_addr = get("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8000".to_string());
        let require_auth = parse_bool("REQUIRE_AUTH", get("REQUIRE_AUTH"), true)?;
        let expose_error_detail =
            parse_bool("EXPOSE_ERROR_DETAIL", get("EXPOSE_ERROR_DETAIL"), true)?;

        let algorithm = match get("JWT_ALGORITHM") {
            Some(name) => parse_algorithm(&name)?,
            None => Algorithm::RS256,
        };

        let oidc = OidcConfig {
            issuer_url: get("OIDC_ISSUER_URL").or_else(|| get("ZITADEL_ISSUER_URL")),
            client_id: get("OIDC_CLIENT_ID").or_else(|| get("ZITADEL_CLIENT_ID")),
            expected_issuer: get("OIDC_EXPECTED_ISSUER"),
            algorithm,
            jwks_timeout: Duration::from_secs(parse_num(
                "JWKS_TIMEOUT_SECS",
                get("JWKS_TIMEOUT_SECS"),
                10,
            )?),
            jwks_cache_ttl: Duration::from_secs(parse_num(
                "JWKS_CACHE_TTL_SECS",
                get("JWKS_CACHE_TTL_SECS"),
                300,
            )?),
            jwks_min_refresh: Duration::from_secs(parse_num(
                "JWKS_MIN_REFRESH_SECS",
                get("JWKS_MIN_REFRESH_SECS"),
                10,
            )?),
        };
        if let Some(issuer) = &oidc.issuer_url {
            validate_url("OIDC_ISSUER_URL", issuer)?;
        }
        if oidc.jwks_timeout.is_zero() {
            return Err("JWKS_TIMEOUT_SECS must be greater than zero".to_string());
        }

        let grant_ttl_secs = parse_num(
            "GRANT_TTL_SECS",
            get("GRANT_TTL_SECS"),
            DEFAULT_GRANT_TTL_SECS as u64,
        )?;
        if grant_ttl_secs == 0 {
            return Err("GRANT_TTL_SECS must be greater than zero".to_string());
        }
        if grant_ttl_secs > MAX_GRANT_TTL_SECS as u64 {
            return Err(format!(
                "GRANT_TTL_SECS must be at most {MAX_GRANT_TTL_SECS} (30 days)"
            ));
        }
        let grant_ttl_secs = grant_ttl_secs as i64;

        let livekit = LiveKitConfig {
            api_key: get("LIVEKIT_API_KEY"),
            api_secret: get("LIVEKIT_API_SECRET"),
            url: get("LIVEKIT_URL")
                .or_else(|| get("LIVEKIT_SERVER_URL"))
                .unwrap_or_else(|| LiveKitConfig::default().url),
            grant_ttl_secs,
        };

        validate_url("LIVEKIT_URL", &livekit.url)?;

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173,http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            listen_addr,
            require_auth,
            oidc,
            livekit,
            cors_origins,
            static_dir: get("STATIC_DIR").map(PathBuf::from),
            expose_error_detail,
        })
    }

    /// Human-readable warnings for settings that will make requests fail.
    pub fn startup_warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.livekit.api_key.is_none() {
            warnings.push("LIVEKIT_API_KEY is not set - token generation will fail");
        }
        if self.livekit.api_secret.is_none() {
            warnings.push("LIVEKIT_API_SECRET is not set - token generation will fail");
        }
        if self.require_auth && (self.oidc.issuer_url.is_none() || self.oidc.client_id.is_none())
        {
            warnings.push("REQUIRE_AUTH is true but OIDC_ISSUER_URL or OIDC_CLIENT_ID is missing");
        }
        if !self.require_auth {
            warnings.push("REQUIRE_AUTH is false - every caller is treated as the mock user");
        }
        warnings
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            require_auth: true,
            oidc: OidcConfig::default(),
            livekit: LiveKitConfig::default(),
            cors_origins: Vec::new(),
            static_dir: None,
            expose_error_detail: true,
        }
    }
}

fn parse_bool(key: &str, value: Option<String>, default: bool) -> Result<bool, String> {
    match value.as_deref().map(str::to_ascii_lowercase).as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(format!("{key} must be a boolean, got '{other}'")),
    }
}

fn parse_num(key: &str, value: Option<String>, default: u64) -> Result<u64, String> {
    value
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| format!("{key} must be a non-negative integer"))
        })
        .unwrap_or(Ok(default))
}

fn validate_url(key: &str, value: &str) -> Result<(), String> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| format!("{key} is not a valid URL: {e}"))
}

/// Only RSA-family algorithms can be verified with keys from the key set.
fn parse_algorithm(name: &str) -> Result<Algorithm, String> {
    let alg = Algorithm::from_str(name).map_err(|_| format!("unknown JWT_ALGORITHM '{name}'"))?;
    match alg {
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => Ok(alg),
        _ => Err(format!(
            "JWT_ALGORITHM '{name}' is not supported; use an RSA algorithm (RS*/PS*)"
        )),
    }
}
