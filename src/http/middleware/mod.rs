//! Request interceptors.
//!
//! # Ordering
//! ```text
//! outer (every request):   recover_panic → request id → log_request → secure_headers
//! dynamic (page routes):   session → verify_csrf → authenticate
//! protected:               dynamic + require_authentication
//! ```
//!
//! Composition order is fixed in `http::routes`; each interceptor may assume
//! the ones listed before it already ran.

pub mod auth;
pub mod csrf;
pub mod recover;
pub mod session;

pub use auth::{authenticate, require_authentication, AuthContext, LOGIN_PATH};
pub use csrf::{verify_csrf, CsrfToken};
pub use recover::recover_panic;
