//! HTTP basic authentication covering the whole site.
//!
//! The documentary hides behind a single shared credential pair. Every
//! request goes through [`require_auth`]; anything without a valid
//! `Authorization: Basic` header gets the browser-prompt challenge back.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use base64::prelude::*;

use crate::config::AuthConfig;
use crate::routes::SharedState;

/// Check an `Authorization: Basic` header against the configured pair.
///
/// The scheme matches case-insensitively per RFC 7617. Missing header,
/// non-Basic scheme, broken base64, and a payload without a colon all
/// count as unauthenticated.
pub fn authorized(headers: &HeaderMap, auth: &AuthConfig) -> bool {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return false;
    };
    let Ok(value) = value.to_str() else {
        return false;
    };
    let Some((scheme, encoded)) = value.split_once(' ') else {
        return false;
    };
    if !scheme.eq_ignore_ascii_case("Basic") {
        return false;
    }
    let Ok(decoded) = BASE64_STANDARD.decode(encoded) else {
        return false;
    };
    let Ok(pair) = String::from_utf8(decoded) else {
        return false;
    };
    let Some((username, password)) = pair.split_once(':') else {
        return false;
    };

    username == auth.username && password == auth.password
}

/// The `401` every unauthenticated request gets, challenge header included.
pub fn challenge(realm: &str) -> Response {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header("www-authenticate", format!("Basic realm=\"{realm}\""))
        .body(Body::from("Authentification requise"))
        .expect("valid HTTP response")
}

/// Middleware gating every route behind the password wall.
pub async fn require_auth(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Response {
    if authorized(request.headers(), &state.auth) {
        next.run(request).await
    } else {
        tracing::debug!(path = %request.uri().path(), "unauthenticated request");
        challenge(&state.auth.realm)
    }
}
