//! Custom extractors for Turnstile-specific data

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::prelude::*;
use turnstile_types::auth_adapter::Principal;

// Auth //
//******//
/// Principal attached by the gatekeeper. Rejects with 401 when the request is anonymous.
#[derive(Debug, Clone)]
pub struct Auth(pub Principal);

impl<S> FromRequestParts<S> for Auth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(auth) = parts.extensions.get::<Auth>().cloned() {
			Ok(auth)
		} else {
			Err(Error::Unauthorized)
		}
	}
}

// OptionalAuth //
//***************//
/// Optional auth extractor that doesn't fail if auth is missing
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<Principal>);

impl<S> FromRequestParts<S> for OptionalAuth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let auth = parts.extensions.get::<Auth>().cloned().map(|a| a.0);
		Ok(OptionalAuth(auth))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::http::{Request, StatusCode};
	use axum::response::IntoResponse;

	fn parts(principal: Option<Principal>) -> Parts {
		let mut req = Request::builder().uri("/api/v1/me").body(()).unwrap();
		if let Some(principal) = principal {
			req.extensions_mut().insert(Auth(principal));
		}
		req.into_parts().0
	}

	#[tokio::test]
	async fn test_auth_present() {
		let mut parts = parts(Some(Principal::new("alice")));
		let Auth(principal) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
		assert_eq!(&*principal.subject, "alice");
	}

	#[tokio::test]
	async fn test_auth_missing_is_unauthorized() {
		let mut parts = parts(None);
		let err = Auth::from_request_parts(&mut parts, &()).await.unwrap_err();
		assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn test_optional_auth() {
		let mut parts = parts(None);
		let OptionalAuth(auth) = OptionalAuth::from_request_parts(&mut parts, &()).await.unwrap();
		assert!(auth.is_none());
	}
}

// vim: ts=4
