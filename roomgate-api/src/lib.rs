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

//! roomgate API library.
//!
//! Verifies bearer tokens from an OIDC identity provider and issues
//! room-scoped LiveKit access tokens. The binary entry point (`main.rs`) is a
//! thin wrapper that calls into this library.

pub mod auth;
pub mod config;
pub mod error;
pub mod grant;
pub mod oauth;
pub mod routes;
pub mod state;
