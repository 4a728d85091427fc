//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, Response},
    Router,
};
use tower::ServiceExt;

use snippetbox::config::{validation::MIN_BCRYPT_COST, AppConfig};
use snippetbox::http::{build_router, AppState};
use snippetbox::models::{Database, Snippet, SnippetStore, StoreError, UserStore};
use snippetbox::templates::TemplateCache;

pub const TEMPLATE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/ui/html");

/// Configuration for tests: in-memory database, cheap hashing, plain-HTTP cookies.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.dsn = "sqlite::memory:".into();
    config.database.bcrypt_cost = MIN_BCRYPT_COST;
    config.session.secure_cookie = false;
    config.templates.dir = TEMPLATE_DIR.into();
    config.server.static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/ui/static").into();
    config
}

/// Real SQLite-backed stores.
pub async fn sqlite_state() -> AppState {
    let config = test_config();
    let db = Database::connect(&config.database).await.unwrap();
    state_with(config, Arc::new(db.snippets()), Arc::new(db.users()))
}

/// SQLite users with the given snippet store double.
pub async fn state_with_snippets(snippets: Arc<dyn SnippetStore>) -> AppState {
    let config = test_config();
    let db = Database::connect(&config.database).await.unwrap();
    state_with(config, snippets, Arc::new(db.users()))
}

/// SQLite snippets with the given user store double.
pub async fn state_with_users(users: Arc<dyn UserStore>) -> AppState {
    let config = test_config();
    let db = Database::connect(&config.database).await.unwrap();
    state_with(config, Arc::new(db.snippets()), users)
}

fn state_with(
    config: AppConfig,
    snippets: Arc<dyn SnippetStore>,
    users: Arc<dyn UserStore>,
) -> AppState {
    let templates = TemplateCache::new(&config.templates.dir).unwrap();
    AppState {
        config: Arc::new(config),
        snippets,
        users,
        templates: Arc::new(templates),
    }
}

/// Snippet store that records calls and holds nothing.
#[derive(Default)]
pub struct CountingSnippets {
    pub inserts: AtomicUsize,
    pub lookups: AtomicUsize,
}

impl CountingSnippets {
    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnippetStore for CountingSnippets {
    async fn insert(&self, _title: &str, _content: &str, _days: i64) -> Result<i64, StoreError> {
        Ok(self.inserts.fetch_add(1, Ordering::SeqCst) as i64 + 1)
    }

    async fn get(&self, _id: i64) -> Result<Snippet, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::NotFound)
    }

    async fn latest(&self, _limit: u32) -> Result<Vec<Snippet>, StoreError> {
        Ok(Vec::new())
    }
}

/// Snippet store whose every operation panics.
pub struct PanickingSnippets;

#[async_trait]
impl SnippetStore for PanickingSnippets {
    async fn insert(&self, _title: &str, _content: &str, _days: i64) -> Result<i64, StoreError> {
        panic!("insert exploded");
    }

    async fn get(&self, _id: i64) -> Result<Snippet, StoreError> {
        panic!("get exploded");
    }

    async fn latest(&self, _limit: u32) -> Result<Vec<Snippet>, StoreError> {
        panic!("latest exploded");
    }
}

/// What `StubUsers::exists` answers for a session's user id.
#[derive(Debug, Clone, Copy)]
pub enum Existence {
    /// The account was deleted after the session logged in.
    Gone,
    /// The lookup itself fails.
    Broken,
}

/// User store that accepts any credentials as user 1, then answers
/// `exists` according to `existence`.
pub struct StubUsers {
    pub existence: Existence,
    pub lookups: AtomicUsize,
}

impl StubUsers {
    pub fn new(existence: Existence) -> Self {
        Self {
            existence,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for StubUsers {
    async fn insert(&self, _name: &str, _email: &str, _password: &str) -> Result<i64, StoreError> {
        Ok(1)
    }

    async fn authenticate(&self, _email: &str, _password: &str) -> Result<i64, StoreError> {
        Ok(1)
    }

    async fn exists(&self, _id: i64) -> Result<bool, StoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match self.existence {
            Existence::Gone => Ok(false),
            Existence::Broken => Err(StoreError::Database(sqlx::Error::PoolClosed)),
        }
    }
}

/// A visitor with a cookie jar holding at most the session cookie.
pub struct Browser {
    router: Router,
    pub cookie: Option<String>,
}

impl Browser {
    pub fn new(state: AppState) -> Self {
        Self {
            router: build_router(state),
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> (Response<Body>, String) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> (Response<Body>, String) {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn send(
        &mut self,
        method: Method,
        uri: &str,
        form: Option<String>,
    ) -> (Response<Body>, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form)
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        if let Some(cookie) = session_cookie(response.headers()) {
            self.cookie = Some(cookie);
        }

        let (parts, body) = response.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        (Response::from_parts(parts, Body::empty()), text)
    }
}

/// `session=<value>` from a Set-Cookie header, if one was issued.
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session="))
        .and_then(|v| v.split(';').next())
        .map(str::to_owned)
}

/// Attributes of the issued session cookie, lowercased and sorted, without
/// the value and the lifetime fields.
pub fn session_cookie_attributes(headers: &HeaderMap) -> Option<Vec<String>> {
    let raw = headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session="))?;

    let mut attributes: Vec<String> = raw
        .split(';')
        .skip(1)
        .map(|a| a.trim().to_ascii_lowercase())
        .filter(|a| !a.starts_with("max-age") && !a.starts_with("expires"))
        .collect();
    attributes.sort();
    Some(attributes)
}

/// The hidden CSRF field value embedded in a rendered form.
pub fn csrf_token(html: &str) -> String {
    let marker = "name='csrf_token' value='";
    let start = html.find(marker).expect("page has no csrf field") + marker.len();
    let end = html[start..].find('\'').unwrap() + start;
    html[start..end].to_string()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
