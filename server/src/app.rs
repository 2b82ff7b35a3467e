//! App builder - constructs and runs the Turnstile server

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::prelude::*;
use crate::routes;
use turnstile_core::app::VERSION;
use turnstile_core::rate_limit::{BucketStore, RateLimitApi, spawn_eviction_task};
use turnstile_core::token::TokenService;
use turnstile_core::{GateConfig, ServerMode};
use turnstile_types::auth_adapter::AuthAdapter;

pub struct AppBuilder {
	opts: GateConfig,
	auth_adapter: Option<Arc<dyn AuthAdapter>>,
	rate_limiter: Option<Arc<dyn RateLimitApi>>,
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl AppBuilder {
	pub fn new() -> Self {
		Self::with_config(GateConfig::default())
	}

	pub fn with_config(opts: GateConfig) -> Self {
		AppBuilder { opts, auth_adapter: None, rate_limiter: None }
	}

	// Opts
	pub fn mode(&mut self, mode: ServerMode) -> &mut Self {
		self.opts.mode = mode;
		self
	}
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn jwt_secret(&mut self, secret: impl Into<Box<str>>) -> &mut Self {
		self.opts.token.secret = Some(secret.into());
		self
	}
	pub fn excluded_paths(&mut self, paths: impl IntoIterator<Item = impl Into<Box<str>>>) -> &mut Self {
		self.opts.excluded_paths = paths.into_iter().map(Into::into).collect();
		self
	}

	// Adapters
	pub fn auth_adapter(&mut self, auth_adapter: Arc<dyn AuthAdapter>) -> &mut Self {
		self.auth_adapter = Some(auth_adapter);
		self
	}
	/// Replace the default bucket store (e.g. with one driven by a test clock)
	pub fn rate_limiter(&mut self, rate_limiter: Arc<dyn RateLimitApi>) -> &mut Self {
		self.rate_limiter = Some(rate_limiter);
		self
	}

	/// Build the shared state. Fails on invalid token configuration.
	pub fn build(self) -> ClResult<App> {
		let Some(auth_adapter) = self.auth_adapter else {
			error!("FATAL: No auth adapter configured");
			return Err(Error::ConfigError("No auth adapter configured".to_string()));
		};
		let tokens = TokenService::new(&self.opts.token).inspect_err(|err| {
			error!("FATAL: {}", err);
		})?;
		let rate_limiter = self
			.rate_limiter
			.unwrap_or_else(|| Arc::new(BucketStore::new(self.opts.rate_limit.clone())));

		Ok(Arc::new(AppState {
			opts: self.opts,
			tokens: Arc::new(tokens),
			rate_limiter,
			auth_adapter,
		}))
	}

	/// Build the state and the complete router
	pub fn build_router(self) -> ClResult<(App, Router)> {
		let app = self.build()?;
		let router = routes::init(app.clone()).layer(TraceLayer::new_for_http());
		Ok((app, router))
	}

	pub async fn run(self) -> ClResult<()> {
		info!("Turnstile V{}", VERSION);

		let (app, router) = self.build_router()?;
		info!(
			"Rate limit: {} requests per {:?} per identifier, mode {:?}",
			app.opts.rate_limit.capacity,
			app.opts.rate_limit.window,
			app.opts.mode
		);
		info!("Excluded paths: {:?}", app.opts.excluded_paths);

		let _eviction = spawn_eviction_task(app.rate_limiter.clone(), &app.opts.rate_limit);

		let listener = tokio::net::TcpListener::bind(app.opts.listen.as_ref()).await.map_err(|err| {
			error!("FATAL: Cannot listen on {}: {}", app.opts.listen, err);
			Error::Io(err)
		})?;
		info!("Listening on {}", app.opts.listen);

		axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
			.with_graceful_shutdown(shutdown_signal())
			.await?;

		info!("Shut down");
		Ok(())
	}
}

async fn shutdown_signal() {
	if let Err(err) = tokio::signal::ctrl_c().await {
		warn!("Cannot listen for shutdown signal: {}", err);
		std::future::pending::<()>().await;
	}
}

// vim: ts=4
