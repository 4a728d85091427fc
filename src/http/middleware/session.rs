//! Session loading and the values kept in a session.
//!
//! `tower-sessions` loads the session before the request reaches the rest of
//! the dynamic chain and saves it, only if modified, before the response is
//! returned. The cookie attributes are fixed here and applied to every
//! session cookie issued.

use time::Duration;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::config::SessionConfig;
use crate::error::AppError;
use crate::security::csrf::{generate_token, CSRF_SESSION_KEY};

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session";

/// Session key holding the logged-in user's id.
pub const AUTH_USER_KEY: &str = "authenticatedUserID";

/// Session key holding a one-shot message.
pub const FLASH_KEY: &str = "flash";

/// Build the session layer. The store lives inside the layer, so clones of
/// the router share it.
pub fn session_layer(config: &SessionConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE)
        .with_http_only(true)
        .with_path("/")
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_secure(config.secure_cookie)
        .with_expiry(Expiry::OnInactivity(Duration::hours(config.lifetime_hours)))
}

/// Queue a message for the next page this visitor sees.
pub async fn put_flash(session: &Session, message: &str) -> Result<(), AppError> {
    session.insert(FLASH_KEY, message).await?;
    Ok(())
}

/// Read and remove the pending flash message.
pub async fn take_flash(session: &Session) -> Result<Option<String>, AppError> {
    Ok(session.remove::<String>(FLASH_KEY).await?)
}

/// The user id stored at login, if any.
pub async fn authenticated_user_id(session: &Session) -> Result<Option<i64>, AppError> {
    Ok(session
        .get::<i64>(AUTH_USER_KEY)
        .await?
        .filter(|id| *id != 0))
}

/// Privilege change: new session id, new CSRF token, user id recorded.
pub async fn log_in(session: &Session, user_id: i64) -> Result<(), AppError> {
    session.cycle_id().await?;
    session.insert(AUTH_USER_KEY, user_id).await?;
    session.insert(CSRF_SESSION_KEY, generate_token()).await?;
    Ok(())
}

/// Privilege change: new session id, new CSRF token, user id dropped.
pub async fn log_out(session: &Session) -> Result<(), AppError> {
    session.cycle_id().await?;
    session.remove::<i64>(AUTH_USER_KEY).await?;
    session.insert(CSRF_SESSION_KEY, generate_token()).await?;
    Ok(())
}
