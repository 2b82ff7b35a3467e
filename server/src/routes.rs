use axum::{
	Json, Router,
	http::StatusCode,
	routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::prelude::*;
use turnstile_core::{Auth, Gatekeeper, GatekeeperLayer};

/// # GET /api/v1/health
async fn get_health() -> (StatusCode, Json<serde_json::Value>) {
	(StatusCode::OK, Json(json!({ "status": "UP" })))
}

/// # GET /api/v1/me
#[derive(Serialize)]
pub struct Me {
	username: Box<str>,
	authorities: Box<[Box<str>]>,
}

async fn get_me(Auth(principal): Auth) -> ClResult<(StatusCode, Json<Me>)> {
	Ok((
		StatusCode::OK,
		Json(Me { username: principal.subject, authorities: principal.authorities }),
	))
}

/// Routes guarded by the gatekeeper; it decides itself which paths are public
pub fn init(app: App) -> Router {
	let gatekeeper = Arc::new(Gatekeeper::standard(&app));

	Router::new()
		.route("/api/v1/health", get(get_health))
		.route("/api/v1/auth/login", post(turnstile_auth::post_login))
		.route("/api/v1/auth/register", post(turnstile_auth::post_register))
		.route("/api/v1/auth/refresh", post(turnstile_auth::post_refresh))
		.route("/api/v1/me", get(get_me))
		.layer(GatekeeperLayer::new(gatekeeper))
		.with_state(app)
}

// vim: ts=4
