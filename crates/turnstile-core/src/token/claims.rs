use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Claim names owned by the token service; extra claims may not override them
pub(crate) const RESERVED_CLAIMS: [&str; 4] = ["sub", "type", "iat", "exp"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
	Access,
	Refresh,
}

impl std::fmt::Display for TokenKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TokenKind::Access => write!(f, "access"),
			TokenKind::Refresh => write!(f, "refresh"),
		}
	}
}

/// JWT payload
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
	/// Principal identifier (username)
	pub sub: Box<str>,
	#[serde(rename = "type")]
	pub kind: TokenKind,
	pub iat: Timestamp,
	pub exp: Timestamp,
	#[serde(flatten)]
	pub extra: serde_json::Map<String, serde_json::Value>,
}

impl TokenClaims {
	pub fn is_expired_at(&self, now: Timestamp) -> bool {
		now >= self.exp
	}
}


// vim: ts=4
