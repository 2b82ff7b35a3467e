//! Token Bucket Store
//!
//! Per-identifier token buckets with continuous ("greedy") refill.
//! Buckets live in a sharded concurrent map; each bucket has its own mutex so
//! refill + consume is linearizable per identifier while unrelated
//! identifiers never contend on a shared lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use governor::clock::{Clock, DefaultClock, Reference};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use super::api::{Admission, RateLimitApi, RateLimitInfo, RateLimiterStats};
use super::config::RateLimitConfig;

/// Time elapsed from `earlier` to `now`, zero if the clock did not advance
fn elapsed<I: Reference>(now: I, earlier: I) -> Duration {
	if now > earlier { now.duration_since(earlier).into() } else { Duration::ZERO }
}

/// A single identifier's bucket
#[derive(Debug)]
pub struct TokenBucket<I> {
	capacity: u32,
	window: Duration,
	available: f64,
	last_refill: I,
}

impl<I: Reference> TokenBucket<I> {
	fn new(capacity: u32, window: Duration, now: I) -> Self {
		Self { capacity, window, available: f64::from(capacity), last_refill: now }
	}

	/// Add tokens proportional to the elapsed time, capped at capacity
	fn refill(&mut self, now: I) {
		let elapsed = elapsed(now, self.last_refill);
		if elapsed.is_zero() {
			return;
		}
		let capacity = f64::from(self.capacity);
		let added = elapsed.as_secs_f64() * capacity / self.window.as_secs_f64();
		self.available = (self.available + added).min(capacity);
		self.last_refill = now;
	}

	fn try_take(&mut self) -> bool {
		if self.available >= 1.0 {
			self.available -= 1.0;
			true
		} else {
			false
		}
	}

	pub fn capacity(&self) -> u32 {
		self.capacity
	}

	pub fn available(&self) -> f64 {
		self.available
	}

	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	fn info(&self) -> RateLimitInfo {
		let capacity = f64::from(self.capacity);
		let missing = (capacity - self.available).max(0.0);
		// Absorb float noise so an exact 6.0s does not round up to 7
		let reset = (missing * self.window.as_secs_f64() / capacity - 1e-9).ceil().max(0.0);

		RateLimitInfo {
			limit: self.capacity,
			remaining: self.available.floor().clamp(0.0, capacity) as u32,
			reset_secs: reset as u64,
		}
	}
}

/// Concurrent identifier -> bucket map
pub struct BucketStore<C: Clock = DefaultClock> {
	config: RateLimitConfig,
	clock: C,
	buckets: DashMap<Box<str>, Arc<Mutex<TokenBucket<C::Instant>>>>,
	/// Statistics
	total_admitted: AtomicU64,
	total_limited: AtomicU64,
	total_evicted: AtomicU64,
}

impl BucketStore {
	/// Create a store driven by the default monotonic clock
	pub fn new(config: RateLimitConfig) -> Self {
		Self::with_clock(config, DefaultClock::default())
	}
}

impl Default for BucketStore {
	fn default() -> Self {
		Self::new(RateLimitConfig::default())
	}
}

impl<C: Clock> BucketStore<C> {
	pub fn with_clock(config: RateLimitConfig, clock: C) -> Self {
		Self {
			config,
			clock,
			buckets: DashMap::new(),
			total_admitted: AtomicU64::new(0),
			total_limited: AtomicU64::new(0),
			total_evicted: AtomicU64::new(0),
		}
	}

	pub fn config(&self) -> &RateLimitConfig {
		&self.config
	}

	/// Get the bucket of an identifier, creating a full one on first access.
	///
	/// Concurrent first access for the same identifier yields one shared bucket.
	pub fn resolve(&self, identifier: &str) -> Arc<Mutex<TokenBucket<C::Instant>>> {
		if let Some(bucket) = self.buckets.get(identifier) {
			return bucket.value().clone();
		}

		self.buckets
			.entry(Box::from(identifier))
			.or_insert_with(|| {
				debug!("Creating rate limit bucket for {}", identifier);
				Arc::new(Mutex::new(TokenBucket::new(
					self.config.capacity.get(),
					self.config.window,
					self.clock.now(),
				)))
			})
			.value()
			.clone()
	}

	/// Number of live buckets
	pub fn len(&self) -> usize {
		self.buckets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buckets.is_empty()
	}
}

impl<C> RateLimitApi for BucketStore<C>
where
	C: Clock + Send + Sync,
{
	fn try_consume(&self, identifier: &str) -> bool {
		self.check(identifier).allowed
	}

	fn peek(&self, identifier: &str) -> RateLimitInfo {
		let bucket = self.resolve(identifier);
		let mut bucket = bucket.lock();
		bucket.refill(self.clock.now());
		bucket.info()
	}

	fn check(&self, identifier: &str) -> Admission {
		let bucket = self.resolve(identifier);
		let mut bucket = bucket.lock();
		bucket.refill(self.clock.now());
		let allowed = bucket.try_take();
		let info = bucket.info();
		drop(bucket);

		if allowed {
			self.total_admitted.fetch_add(1, Ordering::Relaxed);
		} else {
			self.total_limited.fetch_add(1, Ordering::Relaxed);
			debug!("Rate limited {}: full again in {}s", identifier, info.reset_secs);
		}

		Admission { allowed, info }
	}

	fn remove(&self, identifier: &str) {
		self.buckets.remove(identifier);
	}

	fn clear(&self) {
		self.buckets.clear();
	}

	fn evict_idle(&self, max_idle: Duration) -> usize {
		// A bucket idle for a full window has refilled completely, so dropping
		// it cannot change any future decision.
		let max_idle = max_idle.max(self.config.window);
		let now = self.clock.now();
		let mut removed = 0usize;

		self.buckets.retain(|_, bucket| {
			// Held by an in-flight request
			if Arc::strong_count(bucket) > 1 {
				return true;
			}
			let keep = elapsed(now, bucket.lock().last_refill) < max_idle;
			if !keep {
				removed += 1;
			}
			keep
		});

		self.total_evicted.fetch_add(removed as u64, Ordering::Relaxed);
		removed
	}

	fn stats(&self) -> RateLimiterStats {
		RateLimiterStats {
			tracked_identifiers: self.buckets.len(),
			total_requests_admitted: self.total_admitted.load(Ordering::Relaxed),
			total_requests_limited: self.total_limited.load(Ordering::Relaxed),
			total_evicted: self.total_evicted.load(Ordering::Relaxed),
		}
	}
}

/// Periodically evict idle buckets so rotating or spoofed addresses cannot
/// grow the map without bound
pub fn spawn_eviction_task(
	limiter: Arc<dyn RateLimitApi>,
	config: &RateLimitConfig,
) -> JoinHandle<()> {
	let max_idle = config.effective_idle_ttl();
	let period = config.sweep_interval.max(Duration::from_secs(1));

	tokio::spawn(async move {
		let mut interval = tokio::time::interval(period);
		interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
		loop {
			interval.tick().await;
			let removed = limiter.evict_idle(max_idle);
			if removed > 0 {
				debug!("Evicted {} idle rate limit buckets", removed);
			}
		}
	})
}


// vim: ts=4
