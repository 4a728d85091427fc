//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Database → Template cache → AppState → HttpServer
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → server stops accepting → in-flight requests drain → pool closes
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, nothing is served half-built
//! - The listener is bound by the caller, after bootstrap succeeds

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::wait_for_termination;
pub use startup::{bootstrap, Bootstrapped, StartupError};
