//! CSRF verification middleware.
//!
//! Runs after the session is loaded. Safe requests get a token minted (once
//! per session) and exposed to handlers; state-changing requests must present
//! the session's current token or are rejected with 400 before any handler
//! runs. Because the token is rotated on login and logout, a token captured
//! before a privilege change no longer verifies.

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::http::server::AppState;
use crate::security::csrf::{
    generate_token, is_safe_method, token_from_form, tokens_match, CSRF_HEADER, CSRF_SESSION_KEY,
};

/// The session's current token, available to handlers for rendering forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken(pub String);

pub async fn verify_csrf(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = request
        .extensions()
        .get::<Session>()
        .cloned()
        .ok_or(AppError::MissingSession)?;

    let token = match session.get::<String>(CSRF_SESSION_KEY).await? {
        Some(token) => token,
        None => {
            let token = generate_token();
            session.insert(CSRF_SESSION_KEY, &token).await?;
            token
        }
    };

    let mut request = if is_safe_method(request.method()) {
        request
    } else {
        let (parts, body) = request.into_parts();
        let bytes = buffer_body(body, state.config.server.max_body_bytes).await?;

        let submitted = parts
            .headers
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
            .or_else(|| token_from_form(&bytes));

        match submitted.as_deref() {
            Some(submitted) if tokens_match(&token, submitted) => {}
            _ => {
                tracing::warn!(
                    method = %parts.method,
                    uri = %parts.uri,
                    token_present = submitted.is_some(),
                    "CSRF verification failed"
                );
                return Err(AppError::Client(StatusCode::BAD_REQUEST));
            }
        }

        Request::from_parts(parts, Body::from(bytes))
    };

    request.extensions_mut().insert(CsrfToken(token));
    Ok(next.run(request).await)
}

/// Buffer a request body of at most `limit` bytes.
///
/// Exceeding the limit is a 413; a body that cannot be read (client went
/// away, malformed chunking) is a 400.
async fn buffer_body(body: Body, limit: usize) -> Result<Bytes, AppError> {
    // The rejection carries its own status: 413 for a length-limit error,
    // 400 for any other body error.
    let bytes = Bytes::from_request(Request::new(body), &())
        .await
        .map_err(|rejection| AppError::Client(rejection.status()))?;

    if bytes.len() > limit {
        return Err(AppError::Client(StatusCode::PAYLOAD_TOO_LARGE));
    }
    Ok(bytes)
}
