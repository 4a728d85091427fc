//! Per-request page context for handlers on the dynamic chain.

use axum::{extract::FromRequestParts, http::request::Parts};
use chrono::{Datelike, Utc};
use tower_sessions::Session;

use crate::error::AppError;
use crate::http::middleware::{session::take_flash, AuthContext, CsrfToken};
use crate::templates::TemplateData;

/// Everything the dynamic chain attached to the request.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub session: Session,
    pub auth: AuthContext,
    pub csrf_token: String,
}

impl<S: Send + Sync> FromRequestParts<S> for PageContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AppError::MissingSession)?;
        let auth = parts.extensions.get::<AuthContext>().copied().unwrap_or_default();
        let csrf_token = parts
            .extensions
            .get::<CsrfToken>()
            .map(|CsrfToken(token)| token.clone())
            .unwrap_or_default();

        Ok(Self {
            session,
            auth,
            csrf_token,
        })
    }
}

impl PageContext {
    /// Base template data. Consumes any pending flash message.
    pub async fn template_data(&self) -> Result<TemplateData, AppError> {
        Ok(TemplateData {
            current_year: Utc::now().year(),
            flash: take_flash(&self.session).await?,
            is_authenticated: self.auth.is_authenticated(),
            csrf_token: self.csrf_token.clone(),
            ..TemplateData::default()
        })
    }
}
