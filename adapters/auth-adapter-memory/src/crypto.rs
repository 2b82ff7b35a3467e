use turnstile_types::prelude::*;

pub const BCRYPT_COST: u32 = 10;

fn generate_password_hash_sync(password: &str, cost: u32) -> ClResult<Box<str>> {
	let hash = bcrypt::hash(password, cost)
		.map_err(|err| Error::Internal(format!("password hashing failed: {}", err)))?;

	Ok(hash.into())
}

/// Hash a password off the async executor
pub async fn generate_password_hash(password: Box<str>, cost: u32) -> ClResult<Box<str>> {
	tokio::task::spawn_blocking(move || generate_password_hash_sync(&password, cost))
		.await
		.map_err(|err| Error::Internal(format!("password hashing task failed: {}", err)))?
}

fn check_password_sync(password: &str, password_hash: &str) -> ClResult<()> {
	let res = bcrypt::verify(password, password_hash).map_err(|_| Error::InvalidCredentials)?;
	if res { Ok(()) } else { Err(Error::InvalidCredentials) }
}

/// Verify a password against its bcrypt hash off the async executor
pub async fn check_password(password: Box<str>, password_hash: Box<str>) -> ClResult<()> {
	tokio::task::spawn_blocking(move || check_password_sync(&password, &password_hash))
		.await
		.map_err(|err| Error::Internal(format!("password check task failed: {}", err)))?
}


// vim: ts=4
