//! HTTP server setup.
//!
//! # Responsibilities
//! - Hold the shared application state injected into handlers
//! - Bind the composed router to a listener
//! - Serve until the shutdown signal fires, then drain

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::http::routes;
use crate::models::{SnippetStore, UserStore};
use crate::templates::{TemplateCache, TemplateData};

/// Application state injected into handlers and middleware.
///
/// Every field is either immutable or safe for concurrent use, so cloning the
/// state per request is just reference-count bumps.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub snippets: Arc<dyn SnippetStore>,
    pub users: Arc<dyn UserStore>,
    pub templates: Arc<TemplateCache>,
}

impl AppState {
    /// Render a cached page into a complete HTML response.
    pub fn render(
        &self,
        status: StatusCode,
        page: &str,
        data: &TemplateData,
    ) -> Result<Response, AppError> {
        let body = self.templates.render(page, data)?;
        Ok((status, Html(body)).into_response())
    }
}

/// HTTP server for the snippet site.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: routes::build_router(state),
        }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
