//! Token Service
//!
//! Issues and validates HS256 bearer tokens. Validity is a pure function of
//! the signature and the current time; nothing is stored server side.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;

use super::claims::{RESERVED_CLAIMS, TokenClaims, TokenKind};
use super::config::TokenConfig;
use super::error::TokenError;
use crate::prelude::*;
use turnstile_types::auth_adapter::Principal;

/// Minimum signing secret length in bytes (256 bits for HS256)
pub const MIN_SECRET_LEN: usize = 32;

/// Generate a random signing secret (32 random bytes, base64 encoded)
pub fn generate_secret() -> Box<str> {
	let mut secret_bytes = [0u8; 32];
	let mut rng = rand::rng();
	rng.fill_bytes(&mut secret_bytes);
	base64::engine::general_purpose::STANDARD.encode(secret_bytes).into()
}

/// True if the token has three segments and both header and claims decode
fn is_well_formed(token: &str) -> bool {
	let mut segments = token.split('.');
	let (Some(_), Some(payload), Some(_), None) =
		(segments.next(), segments.next(), segments.next(), segments.next())
	else {
		return false;
	};
	if jsonwebtoken::decode_header(token).is_err() {
		return false;
	}
	URL_SAFE_NO_PAD
		.decode(payload)
		.is_ok_and(|claims| serde_json::from_slice::<TokenClaims>(&claims).is_ok())
}

#[allow(clippy::cast_possible_wrap)]
fn ttl_secs(ttl: Duration) -> i64 {
	ttl.as_secs().min(i64::MAX as u64) as i64
}

pub struct TokenService {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	validation: Validation,
	access_ttl: Duration,
	refresh_ttl: Duration,
}

impl TokenService {
	/// Build the service, rejecting secrets shorter than [`MIN_SECRET_LEN`]
	pub fn new(config: &TokenConfig) -> ClResult<Self> {
		let secret = match &config.secret {
			Some(secret) => secret.clone(),
			None => {
				warn!("No JWT secret configured, generated a random one. Tokens will not survive a restart.");
				generate_secret()
			}
		};
		if secret.len() < MIN_SECRET_LEN {
			return Err(Error::ConfigError(format!(
				"JWT secret must be at least {} bytes, got {}",
				MIN_SECRET_LEN,
				secret.len()
			)));
		}
		for (name, ttl) in [("access", config.access_ttl), ("refresh", config.refresh_ttl)] {
			if ttl < Duration::from_secs(1) {
				return Err(Error::ConfigError(format!(
					"{} token lifetime must be at least one second",
					name
				)));
			}
		}

		// Expiry is checked against our own clock so that callers can tell an
		// expired token from a forged one.
		let mut validation = Validation::new(Algorithm::HS256);
		validation.validate_exp = false;
		validation.validate_aud = false;
		validation.leeway = 0;
		validation.set_required_spec_claims(&["sub", "exp"]);

		Ok(Self {
			encoding_key: EncodingKey::from_secret(secret.as_bytes()),
			decoding_key: DecodingKey::from_secret(secret.as_bytes()),
			validation,
			access_ttl: config.access_ttl,
			refresh_ttl: config.refresh_ttl,
		})
	}

	pub fn access_ttl(&self) -> Duration {
		self.access_ttl
	}

	pub fn refresh_ttl(&self) -> Duration {
		self.refresh_ttl
	}

	/// Issue a short-lived access token
	pub fn issue_access_token(&self, principal: &Principal) -> ClResult<Box<str>> {
		self.issue(principal, TokenKind::Access, serde_json::Map::new())
	}

	/// Issue an access token carrying additional claims
	pub fn issue_access_token_with_claims(
		&self,
		principal: &Principal,
		extra: serde_json::Map<String, serde_json::Value>,
	) -> ClResult<Box<str>> {
		self.issue(principal, TokenKind::Access, extra)
	}

	/// Issue a long-lived refresh token
	pub fn issue_refresh_token(&self, principal: &Principal) -> ClResult<Box<str>> {
		self.issue(principal, TokenKind::Refresh, serde_json::Map::new())
	}

	fn issue(
		&self,
		principal: &Principal,
		kind: TokenKind,
		mut extra: serde_json::Map<String, serde_json::Value>,
	) -> ClResult<Box<str>> {
		for claim in RESERVED_CLAIMS {
			extra.remove(claim);
		}
		let ttl = match kind {
			TokenKind::Access => self.access_ttl,
			TokenKind::Refresh => self.refresh_ttl,
		};
		let iat = Timestamp::now();
		let claims = TokenClaims {
			sub: principal.subject.clone(),
			kind,
			iat,
			exp: iat.add_seconds(ttl_secs(ttl)),
			extra,
		};
		self.encode(&claims)
	}

	pub(crate) fn encode(&self, claims: &TokenClaims) -> ClResult<Box<str>> {
		jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
			.map(Into::into)
			.map_err(|err| Error::Internal(format!("token encoding failed: {}", err)))
	}

	/// Verify the signature and parse the claims, ignoring expiry
	pub fn inspect(&self, token: &str) -> Result<TokenClaims, TokenError> {
		if !is_well_formed(token) {
			return Err(TokenError::Malformed);
		}
		jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
			.map(|data| data.claims)
			.map_err(|err| match TokenError::from(err) {
				// Header and claims parse, so only the signature segment is broken
				TokenError::Malformed => TokenError::SignatureMismatch,
				err => err,
			})
	}

	pub fn extract_subject(&self, token: &str) -> Result<Box<str>, TokenError> {
		Ok(self.inspect(token)?.sub)
	}

	pub fn is_expired(&self, token: &str) -> Result<bool, TokenError> {
		Ok(self.inspect(token)?.is_expired_at(Timestamp::now()))
	}

	/// True iff the signature verifies, the subject matches and the token has not expired.
	///
	/// Only unparsable input is reported as an error.
	pub fn validate(&self, token: &str, principal: &Principal) -> Result<bool, TokenError> {
		match self.inspect(token) {
			Ok(claims) => {
				if claims.sub != principal.subject {
					debug!("Token subject {} does not match {}", claims.sub, principal.subject);
					return Ok(false);
				}
				if claims.is_expired_at(Timestamp::now()) {
					warn!("Expired token for {}", claims.sub);
					return Ok(false);
				}
				Ok(true)
			}
			Err(TokenError::Malformed) => Err(TokenError::Malformed),
			Err(err) => {
				warn!("Token rejected: {}", err);
				Ok(false)
			}
		}
	}

	pub fn is_refresh_type(&self, token: &str) -> bool {
		self.inspect(token).is_ok_and(|claims| claims.kind == TokenKind::Refresh)
	}

	/// Full check of a request bearer token: signature, expiry and `type=access`
	pub fn verify_access(&self, token: &str) -> Result<TokenClaims, TokenError> {
		let claims = self.inspect(token)?;
		if claims.is_expired_at(Timestamp::now()) {
			return Err(TokenError::Expired);
		}
		if claims.kind != TokenKind::Access {
			return Err(TokenError::WrongType);
		}
		Ok(claims)
	}

	/// Mint a new access token from a refresh token.
	///
	/// The refresh token itself is not rotated and stays valid until it expires.
	pub fn refresh(&self, refresh_token: &str, principal: &Principal) -> ClResult<Box<str>> {
		let claims = self.inspect(refresh_token)?;
		if claims.kind != TokenKind::Refresh {
			return Err(TokenError::WrongType.into());
		}
		if claims.sub != principal.subject {
			return Err(TokenError::SubjectMismatch.into());
		}
		if claims.is_expired_at(Timestamp::now()) {
			return Err(TokenError::Expired.into());
		}
		self.issue_access_token(principal)
	}
}

impl std::fmt::Debug for TokenService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TokenService")
			.field("access_ttl", &self.access_ttl)
			.field("refresh_ttl", &self.refresh_ttl)
			.finish_non_exhaustive()
	}
}


// vim: ts=4
