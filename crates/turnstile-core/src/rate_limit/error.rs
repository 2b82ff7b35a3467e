//! Rate Limiting Error Types

use axum::Json;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use super::api::RateLimitInfo;

pub const HEADER_LIMIT: &str = "x-ratelimit-limit";
pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";
pub const HEADER_RESET: &str = "x-ratelimit-reset";

/// Rate limit error types
#[derive(Debug)]
pub enum RateLimitError {
	/// Bucket of the identifier is empty
	RateLimited {
		/// Bucket state at rejection time
		info: RateLimitInfo,
	},
}

impl std::fmt::Display for RateLimitError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			RateLimitError::RateLimited { info } => {
				write!(f, "Rate limit of {} exceeded, retry after {}s", info.limit, info.reset_secs)
			}
		}
	}
}

impl std::error::Error for RateLimitError {}

/// Write the `X-RateLimit-*` headers for a bucket snapshot
pub fn apply_rate_limit_headers(headers: &mut HeaderMap, info: &RateLimitInfo) {
	headers.insert(HEADER_LIMIT, HeaderValue::from(info.limit));
	headers.insert(HEADER_REMAINING, HeaderValue::from(info.remaining));
	headers.insert(HEADER_RESET, HeaderValue::from(info.reset_secs));
}

impl IntoResponse for RateLimitError {
	fn into_response(self) -> Response {
		match self {
			RateLimitError::RateLimited { info } => {
				let status = StatusCode::TOO_MANY_REQUESTS;
				let body = serde_json::json!({
					"timestamp": chrono::Utc::now()
						.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
					"status": status.as_u16(),
					"error": "Too Many Requests",
					"message": format!(
						"Rate limit exceeded. Try again in {} seconds.",
						info.reset_secs
					),
					"limit": info.limit,
					"remaining": 0,
					"retryAfter": info.reset_secs,
				});

				let mut response = (status, Json(body)).into_response();
				let headers = response.headers_mut();
				apply_rate_limit_headers(headers, &RateLimitInfo { remaining: 0, ..info });
				headers.insert(axum::http::header::RETRY_AFTER, HeaderValue::from(info.reset_secs));

				response
			}
		}
	}
}


// vim: ts=4
