//! Route table and middleware composition.
//!
//! ```text
//! recover_panic → request id → log_request → secure_headers → router
//!     /static/*            ServeDir
//!     /ping                ping
//!     page routes          session → verify_csrf → authenticate → handler
//!     protected routes     session → verify_csrf → authenticate → require_authentication → handler
//!     anything else        404 (still inside the outer chain)
//! ```
//!
//! `ServiceBuilder` lists layers outermost first, so each stack below reads
//! left to right in the order a request passes through it. The stacks are
//! assembled once here, not per request.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
};

use crate::http::handlers;
use crate::http::middleware::{
    authenticate, recover_panic, require_authentication, session::session_layer, verify_csrf,
};
use crate::http::request::MakeRequestUuidV4;
use crate::http::server::AppState;
use crate::observability::log_request;
use crate::security::secure_headers;

/// Build the complete router for the given state.
pub fn build_router(state: AppState) -> Router {
    let dynamic = ServiceBuilder::new()
        .layer(session_layer(&state.config.session))
        .layer(middleware::from_fn_with_state(state.clone(), verify_csrf))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let protected = Router::new()
        .route(
            "/snippet/create",
            get(handlers::snippet_create).post(handlers::snippet_create_post),
        )
        .route("/user/logout", post(handlers::user_logout_post))
        .route_layer(middleware::from_fn(require_authentication));

    let pages = Router::new()
        .route("/", get(handlers::home))
        .route("/snippet/view", get(handlers::snippet_view_query))
        .route("/snippet/view/{id}", get(handlers::snippet_view))
        .route(
            "/user/signup",
            get(handlers::user_signup).post(handlers::user_signup_post),
        )
        .route(
            "/user/login",
            get(handlers::user_login).post(handlers::user_login_post),
        )
        .merge(protected)
        .route_layer(dynamic);

    let outer = ServiceBuilder::new()
        .layer(recover_panic())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(middleware::from_fn(log_request))
        .layer(middleware::from_fn(secure_headers));

    Router::new()
        .nest_service("/static", ServeDir::new(&state.config.server.static_dir))
        .route("/ping", get(handlers::ping))
        .merge(pages)
        .fallback(handlers::not_found)
        .layer(outer)
        .with_state(state)
}
