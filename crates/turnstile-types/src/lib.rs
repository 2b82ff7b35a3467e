//! Shared types, adapter traits, and core utilities for Turnstile.
//!
//! This crate contains the foundational types that are shared between the
//! gatekeeper core, the auth handlers, and the adapter implementations.
//! Extracting them into a separate crate lets adapter crates compile
//! without pulling in the HTTP middleware stack.

pub mod auth_adapter;
pub mod error;
pub mod prelude;
pub mod types;

// vim: ts=4
