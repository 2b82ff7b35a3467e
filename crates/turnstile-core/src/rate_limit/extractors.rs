//! Identity Resolver
//!
//! Derives the rate limit key of a request: authenticated callers are keyed
//! by subject (independent of network path), everyone else by the apparent
//! client address.

use std::net::{IpAddr, SocketAddr};

use axum::extract::ConnectInfo;
use axum::http::request::Parts;

use crate::app::ServerMode;

pub const USER_PREFIX: &str = "user:";
pub const IP_PREFIX: &str = "ip:";

/// Build the bucket identifier for a request
///
/// `subject` is the verified token subject, if any. `trust_real_ip` also
/// accepts `X-Real-IP` and `Forwarded` in proxy mode.
pub fn resolve_identifier(
	parts: &Parts,
	subject: Option<&str>,
	mode: ServerMode,
	trust_real_ip: bool,
) -> Box<str> {
	if let Some(subject) = subject.filter(|s| !s.is_empty()) {
		return format!("{}{}", USER_PREFIX, subject).into();
	}

	match extract_client_addr(parts, mode, trust_real_ip) {
		Some(addr) => format!("{}{}", IP_PREFIX, addr).into(),
		None => format!("{}unknown", IP_PREFIX).into(),
	}
}

/// Extract the client address from a request based on ServerMode
///
/// - Standalone mode: peer IP from ConnectInfo
/// - Proxy mode: the leftmost X-Forwarded-For entry if present and non-empty,
///   otherwise the peer IP. With `trust_real_ip`, X-Real-IP and Forwarded are
///   consulted between the two.
pub fn extract_client_addr(
	parts: &Parts,
	mode: ServerMode,
	trust_real_ip: bool,
) -> Option<Box<str>> {
	match mode {
		ServerMode::Standalone => peer_ip(parts).map(|ip| ip.to_string().into()),
		ServerMode::Proxy => extract_from_xff(parts)
			.or_else(|| {
				if trust_real_ip {
					extract_from_x_real_ip(parts).or_else(|| extract_from_forwarded(parts))
				} else {
					None
				}
			})
			.or_else(|| peer_ip(parts).map(|ip| ip.to_string().into())),
	}
}

fn peer_ip(parts: &Parts) -> Option<IpAddr> {
	parts.extensions.get::<ConnectInfo<SocketAddr>>().map(|ci| ci.0.ip())
}

/// Leftmost X-Forwarded-For entry; IP addresses are normalized, anything else is kept as sent
fn extract_from_xff(parts: &Parts) -> Option<Box<str>> {
	let value = parts.headers.get("x-forwarded-for")?.to_str().ok()?;
	// "client, proxy1, proxy2": the leftmost entry is the original client
	let client = value.split(',').next().map(str::trim).filter(|s| !s.is_empty())?;
	Some(match client.parse::<IpAddr>() {
		Ok(ip) => ip.to_string().into(),
		Err(_) => client.into(),
	})
}

/// Extract IP from X-Real-IP header
fn extract_from_x_real_ip(parts: &Parts) -> Option<Box<str>> {
	parts
		.headers
		.get("x-real-ip")
		.and_then(|h| h.to_str().ok())
		.and_then(|s| s.trim().parse::<IpAddr>().ok())
		.map(|ip| ip.to_string().into())
}

/// Extract IP from Forwarded header (RFC 7239)
fn extract_from_forwarded(parts: &Parts) -> Option<Box<str>> {
	parts.headers.get("forwarded").and_then(|h| h.to_str().ok()).and_then(|s| {
		// "for=192.0.2.60;proto=http;by=203.0.113.43" or "for=\"[2001:db8::1]\""
		s.split([';', ','])
			.map(str::trim)
			.find_map(|part| {
				let (key, value) = part.split_once('=')?;
				key.eq_ignore_ascii_case("for").then_some(value)
			})
			.and_then(|value| {
				let cleaned = value.trim_matches('"').trim_start_matches('[');
				// Drop a trailing "]:port" or "]"
				let cleaned = cleaned.split(']').next().unwrap_or(cleaned);
				cleaned.parse::<IpAddr>().ok()
			})
			.map(|ip| ip.to_string().into())
	})
}


// vim: ts=4
