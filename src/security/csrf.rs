//! CSRF token primitives.
//!
//! A token is 32 random bytes, URL-safe base64 encoded, stored in the
//! visitor's session. State-changing requests must echo it back either in the
//! `x-csrf-token` header or the `csrf_token` form field.

use axum::http::Method;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;

/// Session key holding the current token.
pub const CSRF_SESSION_KEY: &str = "csrf_token";

/// Form field carrying the submitted token.
pub const CSRF_FORM_FIELD: &str = "csrf_token";

/// Header carrying the submitted token (for non-form clients).
pub const CSRF_HEADER: &str = "x-csrf-token";

const TOKEN_BYTES: usize = 32;

/// Mint a fresh token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Methods that never change state and therefore skip verification.
pub fn is_safe_method(method: &Method) -> bool {
    [Method::GET, Method::HEAD, Method::OPTIONS, Method::TRACE].contains(method)
}

/// Compare two tokens without short-circuiting on the first differing byte.
pub fn tokens_match(expected: &str, submitted: &str) -> bool {
    let (a, b) = (expected.as_bytes(), submitted.as_bytes());
    if a.len() != b.len() || a.is_empty() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Pull the token out of an `application/x-www-form-urlencoded` body.
pub fn token_from_form(body: &[u8]) -> Option<String> {
    url::form_urlencoded::parse(body)
        .find(|(key, _)| key == CSRF_FORM_FIELD)
        .map(|(_, value)| value.into_owned())
}
