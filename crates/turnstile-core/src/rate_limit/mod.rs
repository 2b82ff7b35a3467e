//! Rate Limiting System
//!
//! Per-identifier token buckets with continuous refill. Authenticated callers
//! are keyed by subject, anonymous traffic by client address.

mod api;
mod config;
mod error;
mod extractors;
mod limiter;

pub use api::{Admission, RateLimitApi, RateLimitInfo, RateLimiterStats};
pub use config::RateLimitConfig;
pub use error::{
	HEADER_LIMIT, HEADER_REMAINING, HEADER_RESET, RateLimitError, apply_rate_limit_headers,
};
pub use extractors::{IP_PREFIX, USER_PREFIX, extract_client_addr, resolve_identifier};
pub use limiter::{BucketStore, TokenBucket, spawn_eviction_task};

// vim: ts=4
