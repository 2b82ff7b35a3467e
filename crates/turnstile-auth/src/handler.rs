use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::prelude::*;
use turnstile_core::token::{TokenError, TokenService};
use turnstile_types::auth_adapter::UserRecord;

/// Delay before answering a failed login
const LOGIN_FAILURE_DELAY: Duration = Duration::from_secs(1);

/// Token pair returned by login, registration and refresh
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
	pub access_token: Box<str>,
	pub refresh_token: Box<str>,
	pub token_type: Box<str>,
	/// Access token lifetime in seconds
	pub expires_in: u64,
	pub username: Box<str>,
	pub email: Box<str>,
}

impl AuthResponse {
	pub fn new(
		tokens: &TokenService,
		user: &UserRecord,
		access_token: Box<str>,
		refresh_token: Box<str>,
	) -> Self {
		AuthResponse {
			access_token,
			refresh_token,
			token_type: "Bearer".into(),
			expires_in: tokens.access_ttl().as_secs(),
			username: user.username.clone(),
			email: user.email.clone(),
		}
	}

	/// Issue a fresh access/refresh pair for a user
	pub fn issue(tokens: &TokenService, user: &UserRecord) -> ClResult<Self> {
		let principal = user.principal();
		let access_token = tokens.issue_access_token(&principal)?;
		let refresh_token = tokens.issue_refresh_token(&principal)?;
		Ok(Self::new(tokens, user, access_token, refresh_token))
	}
}

/// # POST /api/v1/auth/login
#[derive(Deserialize)]
pub struct LoginReq {
	username: String,
	password: String,
}

pub async fn post_login(
	State(app): State<App>,
	Json(login): Json<LoginReq>,
) -> ClResult<(StatusCode, Json<AuthResponse>)> {
	info!("Login attempt for {}", login.username);

	match app.auth_adapter.check_password(&login.username, &login.password).await {
		Ok(user) => {
			let res = AuthResponse::issue(&app.tokens, &user)?;
			info!("Login succeeded for {}", user.username);
			Ok((StatusCode::OK, Json(res)))
		}
		Err(Error::InvalidCredentials | Error::UnknownPrincipal) => {
			warn!("Login failed for {}", login.username);
			tokio::time::sleep(LOGIN_FAILURE_DELAY).await;
			Err(Error::InvalidCredentials)
		}
		Err(err) => Err(err),
	}
}

/// # POST /api/v1/auth/refresh
#[derive(Deserialize)]
pub struct RefreshReq {
	refresh_token: String,
}

pub async fn post_refresh(
	State(app): State<App>,
	Json(req): Json<RefreshReq>,
) -> ClResult<(StatusCode, Json<AuthResponse>)> {
	let subject = app.tokens.extract_subject(&req.refresh_token)?;
	if !app.tokens.is_refresh_type(&req.refresh_token) {
		warn!("Refresh attempted with a non-refresh token for {}", subject);
		return Err(TokenError::WrongType.into());
	}

	let user = app.auth_adapter.read_user(&subject).await?;
	let access_token = app.tokens.refresh(&req.refresh_token, &user.principal())?;
	debug!("Refreshed access token for {}", user.username);

	// The refresh token is returned unchanged and stays valid until it expires
	let res = AuthResponse::new(&app.tokens, &user, access_token, req.refresh_token.into());
	Ok((StatusCode::OK, Json(res)))
}


// vim: ts=4
