//! Gatekeeper Middleware
//!
//! Tower layer that runs the gatekeeper in front of Axum routes.

use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures::future::BoxFuture;
use tower::{Layer, Service};

use super::Gatekeeper;
use super::stage::GateContext;
use crate::extract::Auth;
use crate::rate_limit::apply_rate_limit_headers;

/// Gatekeeper middleware layer
#[derive(Clone)]
pub struct GatekeeperLayer {
	gatekeeper: Arc<Gatekeeper>,
}

impl GatekeeperLayer {
	pub fn new(gatekeeper: Arc<Gatekeeper>) -> Self {
		Self { gatekeeper }
	}
}

impl<S> Layer<S> for GatekeeperLayer {
	type Service = GatekeeperService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		GatekeeperService { inner, gatekeeper: self.gatekeeper.clone() }
	}
}

/// Gatekeeper middleware service
#[derive(Clone)]
pub struct GatekeeperService<S> {
	inner: S,
	gatekeeper: Arc<Gatekeeper>,
}

impl<S> Service<Request<Body>> for GatekeeperService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send + 'static,
{
	type Response = S::Response;
	type Error = S::Error;
	type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let gatekeeper = self.gatekeeper.clone();
		// Take the service that was driven to readiness, leave a fresh clone behind
		let clone = self.inner.clone();
		let mut inner = std::mem::replace(&mut self.inner, clone);

		Box::pin(async move {
			let (mut parts, body) = req.into_parts();

			let (principal, rate_limit) = {
				let mut ctx = GateContext::new(&parts);
				if let Some(rejection) = gatekeeper.run(&mut ctx).await {
					return Ok(rejection);
				}
				(ctx.principal, ctx.rate_limit)
			};

			if let Some(principal) = principal {
				parts.extensions.insert(Auth(principal));
			}

			let mut response = inner.call(Request::from_parts(parts, body)).await?;
			if let Some(info) = rate_limit {
				apply_rate_limit_headers(response.headers_mut(), &info);
			}
			Ok(response)
		})
	}
}

// vim: ts=4
