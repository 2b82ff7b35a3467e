//! In-memory authentication adapter.
//!
//! Keeps user accounts in a process-local map. Passwords are stored as
//! bcrypt hashes; hashing and verification run on the blocking pool.

#![forbid(unsafe_code)]

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::OnceCell;

use turnstile_types::auth_adapter::{AuthAdapter, CreateUserData, UserRecord};
use turnstile_types::prelude::*;

mod crypto;

pub use crypto::BCRYPT_COST;

/// Authority granted to every registered user
pub const DEFAULT_AUTHORITY: &str = "ROLE_USER";

/// Password hashed once and verified against when the username is unknown
const DUMMY_PASSWORD: &str = "turnstile-dummy-password";

#[derive(Debug)]
struct StoredUser {
	record: UserRecord,
	password_hash: Box<str>,
}

#[derive(Debug)]
pub struct AuthAdapterMemory {
	users: RwLock<HashMap<Box<str>, StoredUser>>,
	cost: u32,
	dummy_hash: OnceCell<Box<str>>,
}

impl Default for AuthAdapterMemory {
	fn default() -> Self {
		Self::new()
	}
}

impl AuthAdapterMemory {
	pub fn new() -> Self {
		Self::with_cost(BCRYPT_COST)
	}

	/// Use a custom bcrypt cost (4..=31)
	pub fn with_cost(cost: u32) -> Self {
		Self {
			users: RwLock::new(HashMap::new()),
			cost: cost.clamp(4, 31),
			dummy_hash: OnceCell::new(),
		}
	}

	pub fn len(&self) -> usize {
		self.users.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.users.read().is_empty()
	}

	fn check_unique(
		users: &HashMap<Box<str>, StoredUser>,
		username: &str,
		email: &str,
	) -> ClResult<()> {
		if users.contains_key(username) {
			return Err(Error::Conflict("Username is already in use".into()));
		}
		if users.values().any(|u| u.record.email.eq_ignore_ascii_case(email)) {
			return Err(Error::Conflict("Email is already in use".into()));
		}
		Ok(())
	}
}

#[async_trait]
impl AuthAdapter for AuthAdapterMemory {
	async fn read_user(&self, username: &str) -> ClResult<UserRecord> {
		self.users.read().get(username).map(|u| u.record.clone()).ok_or(Error::UnknownPrincipal)
	}

	async fn check_password(&self, username: &str, password: &str) -> ClResult<UserRecord> {
		let user = self
			.users
			.read()
			.get(username)
			.map(|u| (u.record.clone(), u.password_hash.clone()));

		let Some((record, password_hash)) = user else {
			// Same bcrypt work as a wrong password, so timing does not reveal the username
			let dummy_hash = self
				.dummy_hash
				.get_or_try_init(|| crypto::generate_password_hash(DUMMY_PASSWORD.into(), self.cost))
				.await?;
			let _ = crypto::check_password(password.into(), dummy_hash.clone()).await;
			return Err(Error::UnknownPrincipal);
		};

		crypto::check_password(password.into(), password_hash).await?;
		Ok(record)
	}

	async fn create_user(&self, data: CreateUserData<'_>) -> ClResult<UserRecord> {
		// Fail fast before paying for the hash
		Self::check_unique(&self.users.read(), data.username, data.email)?;

		let password_hash = crypto::generate_password_hash(data.password.into(), self.cost).await?;
		let record = UserRecord {
			username: data.username.into(),
			email: data.email.into(),
			full_name: data.full_name.map(Into::into),
			authorities: Box::new([DEFAULT_AUTHORITY.into()]),
			created_at: Timestamp::now(),
		};

		let mut users = self.users.write();
		// Re-check: a concurrent registration may have won meanwhile
		Self::check_unique(&users, data.username, data.email)?;
		users.insert(record.username.clone(), StoredUser { record: record.clone(), password_hash });
		drop(users);

		info!("Created user {}", record.username);
		Ok(record)
	}
}


// vim: ts=4
