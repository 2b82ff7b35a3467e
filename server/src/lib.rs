//! Turnstile server
//!
//! Wires the gatekeeper, the auth endpoints and an auth adapter into one
//! Axum application.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod routes;

mod prelude {
	pub use turnstile_core::prelude::*;
}

pub use app::AppBuilder;

// vim: ts=4
