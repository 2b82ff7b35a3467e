use std::time::Duration;

/// Token service settings
#[derive(Clone)]
pub struct TokenConfig {
	/// HMAC signing secret. A random one is generated when unset.
	pub secret: Option<Box<str>>,
	/// Access token lifetime (default 5 minutes)
	pub access_ttl: Duration,
	/// Refresh token lifetime (default 24 hours)
	pub refresh_ttl: Duration,
}

impl Default for TokenConfig {
	fn default() -> Self {
		Self {
			secret: None,
			access_ttl: Duration::from_millis(300_000),
			refresh_ttl: Duration::from_millis(86_400_000),
		}
	}
}

impl std::fmt::Debug for TokenConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TokenConfig")
			.field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
			.field("access_ttl", &self.access_ttl)
			.field("refresh_ttl", &self.refresh_ttl)
			.finish()
	}
}

// vim: ts=4
