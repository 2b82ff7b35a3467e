//! Registration

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::handler::AuthResponse;
use crate::prelude::*;
use turnstile_types::auth_adapter::CreateUserData;

/// # POST /api/v1/auth/register
#[derive(Debug, Deserialize)]
pub struct RegisterReq {
	username: String,
	email: String,
	password: String,
	full_name: Option<String>,
}

fn is_valid_email(email: &str) -> bool {
	let Some((local, domain)) = email.split_once('@') else {
		return false;
	};
	!local.is_empty()
		&& !domain.contains('@')
		&& !email.chars().any(char::is_whitespace)
		&& domain.split('.').count() >= 2
		&& domain.split('.').all(|label| !label.is_empty())
}

fn check_length(field: &str, value: &str, min: usize, max: usize) -> ClResult<()> {
	let len = value.chars().count();
	if len < min || len > max {
		return Err(Error::ValidationError(format!(
			"{} must be between {} and {} characters",
			field, min, max
		)));
	}
	Ok(())
}

impl RegisterReq {
	fn validate(&self) -> ClResult<()> {
		if self.username.trim().is_empty() {
			return Err(Error::ValidationError("Username is required".into()));
		}
		check_length("Username", &self.username, 3, 50)?;

		if self.email.trim().is_empty() {
			return Err(Error::ValidationError("Email is required".into()));
		}
		check_length("Email", &self.email, 1, 150)?;
		if !is_valid_email(&self.email) {
			return Err(Error::ValidationError("Email must be valid".into()));
		}

		if self.password.trim().is_empty() {
			return Err(Error::ValidationError("Password is required".into()));
		}
		check_length("Password", &self.password, 6, 100)?;

		if let Some(full_name) = &self.full_name {
			check_length("Full name", full_name, 0, 200)?;
		}
		Ok(())
	}
}

pub async fn post_register(
	State(app): State<App>,
	Json(req): Json<RegisterReq>,
) -> ClResult<(StatusCode, Json<AuthResponse>)> {
	info!("Registration attempt for {}", req.username);
	req.validate()?;

	let user = app
		.auth_adapter
		.create_user(CreateUserData {
			username: &req.username,
			email: &req.email,
			password: &req.password,
			full_name: req.full_name.as_deref().filter(|name| !name.trim().is_empty()),
		})
		.await?;

	let res = AuthResponse::issue(&app.tokens, &user)?;
	info!("Registered {}", user.username);
	Ok((StatusCode::CREATED, Json(res)))
}


// vim: ts=4
