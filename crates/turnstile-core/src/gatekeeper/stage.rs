//! Pipeline stage contract

use async_trait::async_trait;
use axum::http::request::Parts;
use axum::response::Response;

use crate::rate_limit::RateLimitInfo;
use crate::token::TokenClaims;
use turnstile_types::auth_adapter::Principal;

/// What the pipeline does after a stage has run
#[derive(Debug)]
pub enum StageFlow {
	/// Run the next stage
	Continue,
	/// Skip the remaining stages and hand the request to the handler
	Forward,
	/// Answer the request with this response; the handler is never called
	Reject(Response),
}

/// Per-request state shared by the stages
#[derive(Debug)]
pub struct GateContext<'a> {
	pub parts: &'a Parts,
	/// Raw bearer token, set only once it has been verified
	pub token: Option<Box<str>>,
	pub claims: Option<TokenClaims>,
	/// Rate limit key (`user:...` or `ip:...`)
	pub identifier: Option<Box<str>>,
	/// Bucket state after admission, reported on the response
	pub rate_limit: Option<RateLimitInfo>,
	pub principal: Option<Principal>,
}

impl<'a> GateContext<'a> {
	pub fn new(parts: &'a Parts) -> Self {
		Self { parts, token: None, claims: None, identifier: None, rate_limit: None, principal: None }
	}

	/// Verified token subject, if any
	pub fn subject(&self) -> Option<&str> {
		self.claims.as_ref().map(|claims| claims.sub.as_ref())
	}
}

#[async_trait]
pub trait GateStage: Send + Sync {
	fn name(&self) -> &'static str;

	async fn run(&self, ctx: &mut GateContext<'_>) -> StageFlow;
}

// vim: ts=4
