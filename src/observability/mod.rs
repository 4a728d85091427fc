//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! main
//!     → logging::init (subscriber, env filter)
//! Every request:
//!     → logging::log_request (remote address, protocol, method, target, request id)
//! ```
//!
//! # Design Decisions
//! - Structured `tracing` events, one per request at INFO
//! - Request ID flows from the request-id layer into the log line
//! - `RUST_LOG` wins over the configured level

pub mod logging;

pub use logging::log_request;
