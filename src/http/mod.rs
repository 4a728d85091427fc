//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum::serve, graceful shutdown)
//!     → routes.rs (outer chain, route table, dynamic/protected chains)
//!     → middleware/ (panic recovery, session, CSRF, authentication)
//!     → handlers.rs (forms.rs validation, context.rs page data)
//!     → models (store) / templates (render)
//!     → Send to client
//! ```

pub mod context;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod routes;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use routes::build_router;
pub use server::{AppState, HttpServer};
