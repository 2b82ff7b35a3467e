//! App state type

use std::sync::Arc;

use crate::config::GateConfig;
use crate::rate_limit::RateLimitApi;
use crate::token::TokenService;
use turnstile_types::auth_adapter::AuthAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// How the client address of a request is determined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServerMode {
	/// Directly exposed: only the peer address counts
	Standalone,
	/// Behind a reverse proxy: forwarding headers are trusted
	#[default]
	Proxy,
}

impl std::str::FromStr for ServerMode {
	type Err = turnstile_types::error::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"standalone" => Ok(ServerMode::Standalone),
			"proxy" => Ok(ServerMode::Proxy),
			other => Err(turnstile_types::error::Error::ConfigError(format!(
				"unknown server mode: {}",
				other
			))),
		}
	}
}

pub struct AppState {
	pub opts: GateConfig,
	pub tokens: Arc<TokenService>,
	pub rate_limiter: Arc<dyn RateLimitApi>,
	pub auth_adapter: Arc<dyn AuthAdapter>,
}

impl std::fmt::Debug for AppState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppState")
			.field("opts", &self.opts)
			.field("tokens", &self.tokens)
			.field("auth_adapter", &self.auth_adapter)
			.finish_non_exhaustive()
	}
}

pub type App = Arc<AppState>;


// vim: ts=4
