use jsonwebtoken::errors::ErrorKind;

use crate::prelude::*;

/// Reasons a bearer token is not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
	/// Not a parsable JWT
	Malformed,
	Expired,
	SignatureMismatch,
	/// Access token where a refresh token is required or vice versa
	WrongType,
	/// Token subject differs from the expected principal
	SubjectMismatch,
}

impl std::fmt::Display for TokenError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TokenError::Malformed => write!(f, "malformed token"),
			TokenError::Expired => write!(f, "token expired"),
			TokenError::SignatureMismatch => write!(f, "token signature mismatch"),
			TokenError::WrongType => write!(f, "wrong token type"),
			TokenError::SubjectMismatch => write!(f, "token subject mismatch"),
		}
	}
}

impl std::error::Error for TokenError {}

impl From<jsonwebtoken::errors::Error> for TokenError {
	fn from(err: jsonwebtoken::errors::Error) -> Self {
		match err.kind() {
			ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
				TokenError::SignatureMismatch
			}
			ErrorKind::ExpiredSignature => TokenError::Expired,
			_ => TokenError::Malformed,
		}
	}
}

impl From<TokenError> for Error {
	fn from(err: TokenError) -> Self {
		match err {
			TokenError::Malformed => Error::ValidationError("Invalid token.".to_string()),
			TokenError::WrongType => {
				Error::ValidationError("Invalid token. Not a refresh token.".to_string())
			}
			TokenError::Expired | TokenError::SignatureMismatch | TokenError::SubjectMismatch => {
				Error::ValidationError("Refresh token expired or invalid.".to_string())
			}
		}
	}
}

// vim: ts=4
