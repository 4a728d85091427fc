//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Every response:
//!     → headers.rs (fixed security header set)
//!
//! Dynamic routes:
//!     → csrf.rs (per-session token minting and verification)
//! ```
//!
//! # Design Decisions
//! - Fail closed: a missing or mismatched token rejects the request
//! - Tokens are compared in constant time

pub mod csrf;
pub mod headers;

pub use headers::{apply_security_headers, secure_headers};
