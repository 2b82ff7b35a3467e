//! Authentication subsystem.
//!
//! Issues token pairs for valid credentials and new access tokens for valid
//! refresh tokens. Everything under `/api/v1/auth/` bypasses the gatekeeper.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod handler;
pub mod register;

mod prelude;

pub use handler::{AuthResponse, post_login, post_refresh};
pub use register::post_register;

// vim: ts=4
