//! Core infrastructure for Turnstile.
//!
//! Request admission and identity gatekeeping: per-identifier token bucket
//! rate limiting, stateless bearer tokens, and the gatekeeper middleware that
//! combines them in front of every route.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod config;
pub mod extract;
pub mod gatekeeper;
pub mod prelude;
pub mod rate_limit;
pub mod token;

// Re-export commonly used types
pub use app::{App, AppState, ServerMode};
pub use config::GateConfig;
pub use extract::{Auth, OptionalAuth};
pub use gatekeeper::{Gatekeeper, GatekeeperLayer};

// vim: ts=4
