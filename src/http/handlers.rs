//! Route handlers.
//!
//! Handlers receive already-decoded parameters; anything that came from the
//! visitor (ids, form fields) is validated here and turned into a client error,
//! never a server error.

use std::collections::HashMap;

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};

use crate::error::AppError;
use crate::http::context::PageContext;
use crate::http::forms::{LoginForm, SignupForm, SnippetCreateForm};
use crate::http::middleware::session::{log_in, log_out, put_flash};
use crate::http::server::AppState;
use crate::models::{StoreError, LATEST_LIMIT};

/// Liveness probe. Bypasses the session machinery.
pub async fn ping() -> &'static str {
    "OK"
}

/// Fallback for unmatched paths.
pub async fn not_found() -> AppError {
    AppError::NotFound
}

pub async fn home(State(state): State<AppState>, page: PageContext) -> Result<Response, AppError> {
    let snippets = state.snippets.latest(LATEST_LIMIT).await?;

    let mut data = page.template_data().await?;
    data.snippets = snippets;
    state.render(StatusCode::OK, "home.tmpl", &data)
}

/// `GET /snippet/view/{id}`
pub async fn snippet_view(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    page: PageContext,
) -> Result<Response, AppError> {
    show_snippet(&state, &page, &raw_id).await
}

/// `GET /snippet/view?id=N`
pub async fn snippet_view_query(
    State(state): State<AppState>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    page: PageContext,
) -> Result<Response, AppError> {
    let raw_id = query
        .ok()
        .and_then(|Query(mut params)| params.remove("id"))
        .unwrap_or_default();
    show_snippet(&state, &page, &raw_id).await
}

async fn show_snippet(state: &AppState, page: &PageContext, raw_id: &str) -> Result<Response, AppError> {
    let id = parse_snippet_id(raw_id).ok_or(AppError::NotFound)?;
    let snippet = state.snippets.get(id).await?;

    let mut data = page.template_data().await?;
    data.snippet = Some(snippet);
    state.render(StatusCode::OK, "view.tmpl", &data)
}

/// Snippet ids are positive integers; anything else cannot name a snippet.
pub fn parse_snippet_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id >= 1)
}

pub async fn snippet_create(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<Response, AppError> {
    let data = page.template_data().await?.with_form(&SnippetCreateForm::default())?;
    state.render(StatusCode::OK, "create.tmpl", &data)
}

pub async fn snippet_create_post(
    State(state): State<AppState>,
    page: PageContext,
    form: Result<Form<SnippetCreateForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(mut form) = form.map_err(|_| AppError::Client(StatusCode::BAD_REQUEST))?;

    if !form.validate() {
        let data = page.template_data().await?.with_form(&form)?;
        return state.render(StatusCode::UNPROCESSABLE_ENTITY, "create.tmpl", &data);
    }

    let id = state
        .snippets
        .insert(&form.title, &form.content, form.expires)
        .await?;
    tracing::info!(snippet_id = id, user_id = ?page.auth.user_id(), "Snippet created");

    put_flash(&page.session, "Snippet successfully created!").await?;
    Ok(Redirect::to(&format!("/snippet/view/{id}")).into_response())
}

pub async fn user_signup(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<Response, AppError> {
    let data = page.template_data().await?.with_form(&SignupForm::default())?;
    state.render(StatusCode::OK, "signup.tmpl", &data)
}

pub async fn user_signup_post(
    State(state): State<AppState>,
    page: PageContext,
    form: Result<Form<SignupForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(mut form) = form.map_err(|_| AppError::Client(StatusCode::BAD_REQUEST))?;

    if form.validate() {
        match state.users.insert(&form.name, &form.email, &form.password).await {
            Ok(id) => {
                tracing::info!(user_id = id, "User signed up");
                put_flash(&page.session, "Your signup was successful. Please log in.").await?;
                return Ok(Redirect::to("/user/login").into_response());
            }
            Err(StoreError::DuplicateEmail) => form
                .validator
                .add_field_error("email", "Email address is already in use"),
            Err(e) => return Err(e.into()),
        }
    }

    let data = page.template_data().await?.with_form(&form)?;
    state.render(StatusCode::UNPROCESSABLE_ENTITY, "signup.tmpl", &data)
}

pub async fn user_login(
    State(state): State<AppState>,
    page: PageContext,
) -> Result<Response, AppError> {
    let data = page.template_data().await?.with_form(&LoginForm::default())?;
    state.render(StatusCode::OK, "login.tmpl", &data)
}

pub async fn user_login_post(
    State(state): State<AppState>,
    page: PageContext,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(mut form) = form.map_err(|_| AppError::Client(StatusCode::BAD_REQUEST))?;

    if form.validate() {
        match state.users.authenticate(&form.email, &form.password).await {
            Ok(id) => {
                log_in(&page.session, id).await?;
                tracing::info!(user_id = id, "User logged in");
                return Ok(Redirect::to("/snippet/create").into_response());
            }
            Err(StoreError::InvalidCredentials) => form
                .validator
                .add_non_field_error("Email or password is incorrect"),
            Err(e) => return Err(e.into()),
        }
    }

    let data = page.template_data().await?.with_form(&form)?;
    state.render(StatusCode::UNPROCESSABLE_ENTITY, "login.tmpl", &data)
}

pub async fn user_logout_post(page: PageContext) -> Result<Response, AppError> {
    log_out(&page.session).await?;
    put_flash(&page.session, "You've been logged out successfully!").await?;
    tracing::info!(user_id = ?page.auth.user_id(), "User logged out");
    Ok(Redirect::to("/").into_response())
}
