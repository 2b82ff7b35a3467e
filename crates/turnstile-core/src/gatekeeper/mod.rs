//! Gatekeeper Pipeline
//!
//! Every inbound request passes an ordered list of stages before it reaches
//! a handler: path exclusion, bearer token verification, identity
//! resolution, rate limit admission and principal attachment. Each stage can
//! continue, forward the request directly or reject it.

mod layer;
mod stage;
mod stages;

use axum::response::Response;

use crate::app::AppState;
use crate::prelude::*;

pub use layer::{GatekeeperLayer, GatekeeperService};
pub use stage::{GateContext, GateStage, StageFlow};
pub use stages::{
	BearerToken, Identity, PathExclusion, PrincipalLoader, RateLimitAdmission, bearer_token,
};

pub struct Gatekeeper {
	stages: Box<[Box<dyn GateStage>]>,
}

impl Gatekeeper {
	pub fn new(stages: Vec<Box<dyn GateStage>>) -> Self {
		Self { stages: stages.into_boxed_slice() }
	}

	/// The standard pipeline for an app.
	///
	/// The token is verified before the identifier is resolved so that
	/// authenticated callers are keyed by subject. Principal loading hits the
	/// auth adapter and therefore runs only for admitted requests.
	pub fn standard(app: &AppState) -> Self {
		Self::new(vec![
			Box::new(PathExclusion::new(app.opts.excluded_paths.iter().cloned())),
			Box::new(BearerToken::new(app.tokens.clone())),
			Box::new(Identity::new(app.opts.mode, app.opts.trust_real_ip)),
			Box::new(RateLimitAdmission::new(app.rate_limiter.clone())),
			Box::new(PrincipalLoader::new(app.tokens.clone(), app.auth_adapter.clone())),
		])
	}

	pub fn stage_names(&self) -> Vec<&'static str> {
		self.stages.iter().map(|stage| stage.name()).collect()
	}

	/// Run the stages in order. Returns the rejection response, if any.
	pub async fn run(&self, ctx: &mut GateContext<'_>) -> Option<Response> {
		for stage in self.stages.iter() {
			match stage.run(ctx).await {
				StageFlow::Continue => {}
				StageFlow::Forward => {
					debug!("{} forwarded {}", stage.name(), ctx.parts.uri.path());
					return None;
				}
				StageFlow::Reject(response) => {
					debug!(
						"{} rejected {} with {}",
						stage.name(),
						ctx.parts.uri.path(),
						response.status()
					);
					return Some(response);
				}
			}
		}
		None
	}
}


// vim: ts=4
