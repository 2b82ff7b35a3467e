//! Adapter that owns user accounts and credentials.
//!
//! The gatekeeper only needs to turn a token subject into a [`Principal`];
//! login and registration additionally need credential checks and account
//! creation. Storage is up to the implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::prelude::*;

/// Authenticated identity attached to a request after token validation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
	pub subject: Box<str>,
	pub authorities: Box<[Box<str>]>,
}

impl Principal {
	pub fn new(subject: impl Into<Box<str>>) -> Self {
		Principal { subject: subject.into(), authorities: Box::new([]) }
	}

	pub fn with_authorities(
		subject: impl Into<Box<str>>,
		authorities: impl IntoIterator<Item = impl Into<Box<str>>>,
	) -> Self {
		Principal {
			subject: subject.into(),
			authorities: authorities.into_iter().map(Into::into).collect(),
		}
	}
}

/// A stored user account
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize)]
pub struct UserRecord {
	pub username: Box<str>,
	pub email: Box<str>,
	pub full_name: Option<Box<str>>,
	pub authorities: Box<[Box<str>]>,
	pub created_at: Timestamp,
}

impl UserRecord {
	pub fn principal(&self) -> Principal {
		Principal { subject: self.username.clone(), authorities: self.authorities.clone() }
	}
}

/// Data needed to create a new user
#[derive(Debug)]
pub struct CreateUserData<'a> {
	pub username: &'a str,
	pub email: &'a str,
	pub password: &'a str,
	pub full_name: Option<&'a str>,
}

#[async_trait]
pub trait AuthAdapter: Debug + Send + Sync {
	/// Look up a user by username. Unknown users yield `Error::UnknownPrincipal`.
	async fn read_user(&self, username: &str) -> ClResult<UserRecord>;

	/// Verify a username/password pair.
	///
	/// Fails with `Error::InvalidCredentials` for a wrong password and with
	/// `Error::UnknownPrincipal` for an unknown username.
	async fn check_password(&self, username: &str, password: &str) -> ClResult<UserRecord>;

	/// Create a user. Duplicate usernames or emails yield `Error::Conflict`.
	async fn create_user(&self, data: CreateUserData<'_>) -> ClResult<UserRecord>;

	/// Resolve the principal for a token subject
	async fn read_principal(&self, subject: &str) -> ClResult<Principal> {
		Ok(self.read_user(subject).await?.principal())
	}
}


// vim: ts=4
