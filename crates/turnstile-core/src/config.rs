//! Gatekeeper configuration
//!
//! Everything is read from `TURNSTILE_*` environment variables; unset
//! variables fall back to the defaults below.

use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

use crate::app::ServerMode;
use crate::rate_limit::RateLimitConfig;
use crate::token::TokenConfig;
use turnstile_types::prelude::*;

/// Path prefixes that bypass rate limiting and authentication
pub const DEFAULT_EXCLUDED_PATHS: [&str; 5] =
	["/api/v1/auth/", "/api/v1/health", "/swagger-ui", "/v3/api-docs", "/ws"];

#[derive(Debug, Clone)]
pub struct GateConfig {
	pub listen: Box<str>,
	pub mode: ServerMode,
	/// In proxy mode, also accept `X-Real-IP` and `Forwarded` for the client address
	pub trust_real_ip: bool,
	pub token: TokenConfig,
	pub rate_limit: RateLimitConfig,
	pub excluded_paths: Box<[Box<str>]>,
}

impl Default for GateConfig {
	fn default() -> Self {
		Self {
			listen: "127.0.0.1:8080".into(),
			mode: ServerMode::default(),
			trust_real_ip: false,
			token: TokenConfig::default(),
			rate_limit: RateLimitConfig::default(),
			excluded_paths: DEFAULT_EXCLUDED_PATHS.iter().map(|p| Box::from(*p)).collect(),
		}
	}
}

fn parse<T: FromStr>(name: &str, value: &str) -> ClResult<T> {
	value
		.trim()
		.parse()
		.map_err(|_| Error::ConfigError(format!("invalid value for {}: {:?}", name, value)))
}

impl GateConfig {
	/// Read the configuration from the process environment
	pub fn from_env() -> ClResult<Self> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Build the configuration from an arbitrary variable source
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClResult<Self> {
		let mut config = Self::default();

		if let Some(listen) = lookup("TURNSTILE_LISTEN") {
			config.listen = listen.into();
		}
		if let Some(mode) = lookup("TURNSTILE_MODE") {
			config.mode = mode.parse()?;
		}
		if let Some(trust) = lookup("TURNSTILE_TRUST_REAL_IP") {
			config.trust_real_ip = parse("TURNSTILE_TRUST_REAL_IP", &trust)?;
		}

		if let Some(secret) = lookup("TURNSTILE_JWT_SECRET").filter(|s| !s.is_empty()) {
			config.token.secret = Some(secret.into());
		}
		if let Some(ms) = lookup("TURNSTILE_JWT_EXPIRATION_MS") {
			config.token.access_ttl =
				Duration::from_millis(parse("TURNSTILE_JWT_EXPIRATION_MS", &ms)?);
		}
		if let Some(ms) = lookup("TURNSTILE_JWT_REFRESH_EXPIRATION_MS") {
			config.token.refresh_ttl =
				Duration::from_millis(parse("TURNSTILE_JWT_REFRESH_EXPIRATION_MS", &ms)?);
		}

		if let Some(capacity) = lookup("TURNSTILE_RATE_LIMIT_CAPACITY") {
			let capacity: u32 = parse("TURNSTILE_RATE_LIMIT_CAPACITY", &capacity)?;
			config.rate_limit.capacity = NonZeroU32::new(capacity).ok_or_else(|| {
				Error::ConfigError("TURNSTILE_RATE_LIMIT_CAPACITY must be positive".into())
			})?;
		}
		if let Some(secs) = lookup("TURNSTILE_RATE_LIMIT_WINDOW_SECS") {
			let secs: u64 = parse("TURNSTILE_RATE_LIMIT_WINDOW_SECS", &secs)?;
			if secs == 0 {
				return Err(Error::ConfigError(
					"TURNSTILE_RATE_LIMIT_WINDOW_SECS must be positive".into(),
				));
			}
			config.rate_limit.window = Duration::from_secs(secs);
		}
		if let Some(secs) = lookup("TURNSTILE_RATE_LIMIT_IDLE_SECS") {
			config.rate_limit.idle_ttl =
				Duration::from_secs(parse("TURNSTILE_RATE_LIMIT_IDLE_SECS", &secs)?);
		}

		if let Some(paths) = lookup("TURNSTILE_EXCLUDED_PATHS") {
			config.excluded_paths = paths
				.split(',')
				.map(str::trim)
				.filter(|p| !p.is_empty())
				.map(Box::from)
				.collect();
		}

		Ok(config)
	}
}


// vim: ts=4
