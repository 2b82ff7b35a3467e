//! Error type shared by every Turnstile crate.
//!
//! Every error renders as a JSON body of the form
//! `{timestamp, status, error, message}` so that clients see the same shape
//! regardless of which layer rejected the request.

use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// No (valid) principal is attached to the request
	Unauthorized,
	/// Username/password pair rejected
	InvalidCredentials,
	/// Token subject does not resolve to a known user
	UnknownPrincipal,
	Conflict(String),
	ValidationError(String),
	ConfigError(String),
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::Unauthorized => write!(f, "unauthorized"),
			Error::InvalidCredentials => write!(f, "invalid credentials"),
			Error::UnknownPrincipal => write!(f, "unknown principal"),
			Error::Conflict(msg) => write!(f, "conflict: {}", msg),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(err) => Some(err),
			_ => None,
		}
	}
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Error::Unauthorized | Error::InvalidCredentials | Error::UnknownPrincipal => {
				StatusCode::UNAUTHORIZED
			}
			Error::Conflict(_) => StatusCode::CONFLICT,
			Error::ValidationError(_) => StatusCode::BAD_REQUEST,
			Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	/// Client-facing message. Internal details are never exposed.
	fn public_message(&self) -> String {
		match self {
			Error::Unauthorized => {
				"Unauthorized access. Bearer token missing or invalid.".to_string()
			}
			Error::InvalidCredentials | Error::UnknownPrincipal => {
				"Invalid username or password.".to_string()
			}
			Error::Conflict(msg) | Error::ValidationError(msg) => msg.clone(),
			Error::ConfigError(_) | Error::Internal(_) | Error::Io(_) => {
				"Internal server error.".to_string()
			}
		}
	}
}

/// Build the standard error body.
pub fn error_body(status: StatusCode, message: &str) -> serde_json::Value {
	serde_json::json!({
		"timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
		"status": status.as_u16(),
		"error": status.canonical_reason().unwrap_or("Error"),
		"message": message,
	})
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		if status.is_server_error() {
			tracing::error!("request failed: {}", self);
		}
		(status, Json(error_body(status, &self.public_message()))).into_response()
	}
}


// vim: ts=4
