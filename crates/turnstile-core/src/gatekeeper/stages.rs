//! Built-in gatekeeper stages

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::header;
use axum::response::IntoResponse;

use super::stage::{GateContext, GateStage, StageFlow};
use crate::app::ServerMode;
use crate::extract::Auth;
use crate::prelude::*;
use crate::rate_limit::{RateLimitApi, RateLimitError, resolve_identifier};
use crate::token::TokenService;
use turnstile_types::auth_adapter::AuthAdapter;

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(ctx: &GateContext<'_>) -> Option<Box<str>> {
	let value = ctx.parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
	let token = value.strip_prefix("Bearer ")?.trim();
	(!token.is_empty()).then(|| Box::from(token))
}

// PathExclusion //
//***************//
/// Lets public paths through without rate limiting or authentication
#[derive(Debug)]
pub struct PathExclusion {
	prefixes: Box<[Box<str>]>,
}

impl PathExclusion {
	pub fn new(prefixes: impl IntoIterator<Item = impl Into<Box<str>>>) -> Self {
		Self { prefixes: prefixes.into_iter().map(Into::into).collect() }
	}
}

#[async_trait]
impl GateStage for PathExclusion {
	fn name(&self) -> &'static str {
		"path-exclusion"
	}

	async fn run(&self, ctx: &mut GateContext<'_>) -> StageFlow {
		let path = ctx.parts.uri.path();
		if self.prefixes.iter().any(|prefix| path.starts_with(prefix.as_ref())) {
			StageFlow::Forward
		} else {
			StageFlow::Continue
		}
	}
}

// BearerToken //
//*************//
/// Verifies the bearer token. Invalid tokens leave the request anonymous.
#[derive(Debug)]
pub struct BearerToken {
	tokens: Arc<TokenService>,
}

impl BearerToken {
	pub fn new(tokens: Arc<TokenService>) -> Self {
		Self { tokens }
	}
}

#[async_trait]
impl GateStage for BearerToken {
	fn name(&self) -> &'static str {
		"bearer-token"
	}

	async fn run(&self, ctx: &mut GateContext<'_>) -> StageFlow {
		let Some(token) = bearer_token(ctx) else {
			return StageFlow::Continue;
		};

		match self.tokens.verify_access(&token) {
			Ok(claims) => {
				ctx.claims = Some(claims);
				ctx.token = Some(token);
			}
			Err(err) => warn!("Ignoring bearer token on {}: {}", ctx.parts.uri.path(), err),
		}
		StageFlow::Continue
	}
}

// Identity //
//**********//
/// Derives the rate limit key
#[derive(Debug)]
pub struct Identity {
	mode: ServerMode,
	trust_real_ip: bool,
}

impl Identity {
	pub fn new(mode: ServerMode, trust_real_ip: bool) -> Self {
		Self { mode, trust_real_ip }
	}
}

#[async_trait]
impl GateStage for Identity {
	fn name(&self) -> &'static str {
		"identity"
	}

	async fn run(&self, ctx: &mut GateContext<'_>) -> StageFlow {
		ctx.identifier =
			Some(resolve_identifier(ctx.parts, ctx.subject(), self.mode, self.trust_real_ip));
		StageFlow::Continue
	}
}

// RateLimitAdmission //
//********************//
/// Consumes one token from the caller's bucket or rejects with 429
pub struct RateLimitAdmission {
	limiter: Arc<dyn RateLimitApi>,
}

impl RateLimitAdmission {
	pub fn new(limiter: Arc<dyn RateLimitApi>) -> Self {
		Self { limiter }
	}
}

#[async_trait]
impl GateStage for RateLimitAdmission {
	fn name(&self) -> &'static str {
		"admission"
	}

	async fn run(&self, ctx: &mut GateContext<'_>) -> StageFlow {
		let Some(identifier) = ctx.identifier.as_deref() else {
			error!("Admission stage without identifier, check the stage order");
			return StageFlow::Continue;
		};

		let admission = self.limiter.check(identifier);
		if admission.allowed {
			ctx.rate_limit = Some(admission.info);
			StageFlow::Continue
		} else {
			debug!("Rate limit exceeded for {} on {}", identifier, ctx.parts.uri.path());
			StageFlow::Reject(RateLimitError::RateLimited { info: admission.info }.into_response())
		}
	}
}

// PrincipalLoader //
//*****************//
/// Resolves the verified subject to a principal and attaches it
pub struct PrincipalLoader {
	tokens: Arc<TokenService>,
	auth_adapter: Arc<dyn AuthAdapter>,
}

impl PrincipalLoader {
	pub fn new(tokens: Arc<TokenService>, auth_adapter: Arc<dyn AuthAdapter>) -> Self {
		Self { tokens, auth_adapter }
	}
}

#[async_trait]
impl GateStage for PrincipalLoader {
	fn name(&self) -> &'static str {
		"principal"
	}

	async fn run(&self, ctx: &mut GateContext<'_>) -> StageFlow {
		// Already authenticated by an outer layer
		if ctx.principal.is_some() || ctx.parts.extensions.get::<Auth>().is_some() {
			return StageFlow::Continue;
		}
		let (Some(token), Some(subject)) = (ctx.token.as_deref(), ctx.subject()) else {
			return StageFlow::Continue;
		};

		let principal = match self.auth_adapter.read_principal(subject).await {
			Ok(principal) => principal,
			Err(err) => {
				warn!("Cannot load principal {}: {}", subject, err);
				return StageFlow::Continue;
			}
		};

		match self.tokens.validate(token, &principal) {
			Ok(true) => {
				debug!("Authenticated {}", principal.subject);
				ctx.principal = Some(principal);
			}
			Ok(false) => warn!("Token rejected for {}", principal.subject),
			Err(err) => warn!("Token rejected for {}: {}", principal.subject, err),
		}
		StageFlow::Continue
	}
}


// vim: ts=4
