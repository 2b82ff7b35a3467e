//! Bearer token issuance and validation
//!
//! Stateless HS256 JWTs carrying a `type` claim that separates short-lived
//! access tokens from long-lived refresh tokens.

mod claims;
mod config;
mod error;
mod service;

pub use claims::{TokenClaims, TokenKind};
pub use config::TokenConfig;
pub use error::TokenError;
pub use service::{MIN_SECRET_LEN, TokenService, generate_secret};

// vim: ts=4
