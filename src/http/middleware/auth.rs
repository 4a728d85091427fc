//! Authentication context and route protection.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::http::middleware::session::authenticated_user_id;
use crate::http::server::AppState;

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/user/login";

/// Per-request authentication state. Only `authenticate` constructs an
/// authenticated value, and only after the user was found in the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthContext {
    user_id: Option<i64>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }
}

/// Resolve the session's claimed user id against the user store.
///
/// A session id alone is not trusted: the account may have been deleted.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = request
        .extensions()
        .get::<Session>()
        .cloned()
        .ok_or(AppError::MissingSession)?;

    let context = match authenticated_user_id(&session).await? {
        Some(id) => {
            if state.users.exists(id).await? {
                AuthContext { user_id: Some(id) }
            } else {
                tracing::debug!(user_id = id, "Session refers to an unknown user");
                AuthContext::anonymous()
            }
        }
        None => AuthContext::anonymous(),
    };

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

/// Redirect anonymous visitors to the login page; mark protected pages uncacheable.
pub async fn require_authentication(request: Request, next: Next) -> Response {
    let context = request
        .extensions()
        .get::<AuthContext>()
        .copied()
        .unwrap_or_default();

    if !context.is_authenticated() {
        return Redirect::to(LOGIN_PATH).into_response();
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .append(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
