//! Rate Limiting Internal API
//!
//! Traits and types for programmatic rate limit management.

use std::time::Duration;

/// Snapshot of a bucket as reported in `X-RateLimit-*` headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
	/// Bucket capacity
	pub limit: u32,
	/// Whole tokens currently available
	pub remaining: u32,
	/// Seconds until the bucket is full again
	pub reset_secs: u64,
}

/// Outcome of a combined refill + consume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
	pub allowed: bool,
	/// Bucket state after the attempt
	pub info: RateLimitInfo,
}

/// Statistics about the rate limiter
#[derive(Debug, Clone, Default)]
pub struct RateLimiterStats {
	/// Number of live buckets
	pub tracked_identifiers: usize,
	/// Total requests admitted
	pub total_requests_admitted: u64,
	/// Total requests that were rate limited
	pub total_requests_limited: u64,
	/// Total buckets removed by idle eviction
	pub total_evicted: u64,
}

/// Internal API for programmatic rate limit management
pub trait RateLimitApi: Send + Sync {
	/// Refill, then take one token if available
	fn try_consume(&self, identifier: &str) -> bool;

	/// Refill and report without consuming
	fn peek(&self, identifier: &str) -> RateLimitInfo;

	/// Refill, consume and report under a single lock
	fn check(&self, identifier: &str) -> Admission;

	/// Drop the bucket of one identifier; its next access starts full
	fn remove(&self, identifier: &str);

	/// Drop all buckets
	fn clear(&self);

	/// Remove buckets idle for at least `max_idle`. Returns the number removed.
	fn evict_idle(&self, max_idle: Duration) -> usize;

	/// Get statistics about rate limiter state
	fn stats(&self) -> RateLimiterStats;
}

// vim: ts=4
