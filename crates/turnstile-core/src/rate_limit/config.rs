//! Rate Limiting Configuration
//!
//! Per-identifier token bucket settings: a fixed capacity refilled
//! continuously over a window.

use std::num::NonZeroU32;
use std::time::Duration;

/// Token bucket configuration shared by every identifier
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
	/// Maximum number of tokens in a bucket (burst size)
	pub capacity: NonZeroU32,
	/// Time to refill an empty bucket completely
	pub window: Duration,
	/// Buckets untouched for this long are evicted (never shorter than `window`)
	pub idle_ttl: Duration,
	/// How often the eviction sweep runs
	pub sweep_interval: Duration,
}

impl RateLimitConfig {
	pub fn new(capacity: u32, window: Duration) -> Self {
		Self {
			capacity: NonZeroU32::new(capacity).unwrap_or(NonZeroU32::MIN),
			window: if window.is_zero() { Duration::from_secs(1) } else { window },
			..Self::default()
		}
	}

	/// Idle time after which a bucket is indistinguishable from a new one
	pub fn effective_idle_ttl(&self) -> Duration {
		self.idle_ttl.max(self.window)
	}

	/// Tokens added per second
	pub fn refill_per_sec(&self) -> f64 {
		f64::from(self.capacity.get()) / self.window.as_secs_f64()
	}
}

impl Default for RateLimitConfig {
	fn default() -> Self {
		Self {
			capacity: NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN),
			window: Duration::from_secs(60),
			idle_ttl: Duration::from_secs(600), // 10 minutes
			sweep_interval: Duration::from_secs(60),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = RateLimitConfig::default();
		assert_eq!(config.capacity.get(), 10);
		assert_eq!(config.window, Duration::from_secs(60));
		assert!((config.refill_per_sec() - 10.0 / 60.0).abs() < f64::EPSILON);
	}

	#[test]
	fn test_zero_values_are_clamped() {
		let config = RateLimitConfig::new(0, Duration::ZERO);
		assert_eq!(config.capacity.get(), 1);
		assert_eq!(config.window, Duration::from_secs(1));
	}

	#[test]
	fn test_idle_ttl_never_below_window() {
		let config = RateLimitConfig {
			idle_ttl: Duration::from_secs(5),
			..RateLimitConfig::new(10, Duration::from_secs(60))
		};
		assert_eq!(config.effective_idle_ttl(), Duration::from_secs(60));
	}
}

// vim: ts=4
