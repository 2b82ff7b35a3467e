//! Shared setup for the server integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, Response};
use governor::clock::FakeRelativeClock;
use http_body_util::BodyExt;
use serde_json::Value;

use turnstile_auth_adapter_memory::AuthAdapterMemory;
use turnstile_core::App;
use turnstile_core::rate_limit::{BucketStore, RateLimitConfig};
use turnstile_server::AppBuilder;
use turnstile_types::auth_adapter::{AuthAdapter, CreateUserData};

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";
pub const PEER: &str = "198.51.100.20:40000";

pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub struct TestServer {
	pub app: App,
	pub router: Router,
	pub clock: FakeRelativeClock,
	pub adapter: Arc<AuthAdapterMemory>,
}

/// A server with the default limits, a fake clock and one registered user (alice)
pub async fn test_server() -> TestServer {
	setup_test_logging();

	let clock = FakeRelativeClock::default();
	let adapter = Arc::new(AuthAdapterMemory::with_cost(4));
	adapter
		.create_user(CreateUserData {
			username: "alice",
			email: "alice@example.com",
			password: "wonderland",
			full_name: Some("Alice Liddell"),
		})
		.await
		.unwrap();

	let mut builder = AppBuilder::new();
	builder
		.jwt_secret(SECRET)
		.auth_adapter(adapter.clone())
		.rate_limiter(Arc::new(BucketStore::with_clock(RateLimitConfig::default(), clock.clone())));
	let (app, router) = builder.build_router().unwrap();

	TestServer { app, router, clock, adapter }
}

pub fn get(path: &str, token: Option<&str>) -> Request<Body> {
	request("GET", path, token, None, PEER)
}

pub fn post_json(path: &str, body: &Value) -> Request<Body> {
	request("POST", path, None, Some(body), PEER)
}

pub fn request(
	method: &str,
	path: &str,
	token: Option<&str>,
	body: Option<&Value>,
	peer: &str,
) -> Request<Body> {
	let mut builder = Request::builder().method(method).uri(path);
	if let Some(token) = token {
		builder = builder.header("authorization", format!("Bearer {}", token));
	}
	let body = match body {
		Some(json) => {
			builder = builder.header("content-type", "application/json");
			Body::from(json.to_string())
		}
		None => Body::empty(),
	};
	let mut req = builder.body(body).unwrap();
	req.extensions_mut().insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
	req
}

pub async fn body_json(response: Response<Body>) -> Value {
	let bytes = response.into_body().collect().await.unwrap().to_bytes();
	serde_json::from_slice(&bytes).unwrap()
}

pub fn header<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
	response.headers().get(name).and_then(|v| v.to_str().ok())
}

// vim: ts=4
