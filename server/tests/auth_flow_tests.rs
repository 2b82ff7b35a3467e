//! Register, login, refresh and use of the issued tokens

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::*;

#[tokio::test]
async fn test_register_then_use_access_token() {
	let server = test_server().await;

	let response = server
		.router
		.clone()
		.oneshot(post_json(
			"/api/v1/auth/register",
			&json!({
				"username": "bob",
				"email": "bob@example.com",
				"password": "builder",
				"full_name": "Bob the Builder",
			}),
		))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::CREATED);

	let body = body_json(response).await;
	assert_eq!(body["token_type"], "Bearer");
	assert_eq!(body["expires_in"], 300);
	assert_eq!(body["username"], "bob");
	assert_eq!(body["email"], "bob@example.com");

	let access_token = body["access_token"].as_str().unwrap();
	let response = server.router.oneshot(get("/api/v1/me", Some(access_token))).await.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(body_json(response).await["username"], "bob");
}

#[tokio::test]
async fn test_register_conflicts_and_validation() {
	let server = test_server().await;

	let duplicate = json!({ "username": "alice", "email": "new@example.com", "password": "secret1" });
	let response =
		server.router.clone().oneshot(post_json("/api/v1/auth/register", &duplicate)).await.unwrap();
	assert_eq!(response.status(), StatusCode::CONFLICT);
	assert_eq!(body_json(response).await["status"], 409);

	let invalid = json!({ "username": "al", "email": "not-an-email", "password": "123" });
	let response =
		server.router.oneshot(post_json("/api/v1/auth/register", &invalid)).await.unwrap();
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	assert_eq!(server.adapter.len(), 1);
}

#[tokio::test]
async fn test_login_and_refresh() {
	let server = test_server().await;

	let response = server
		.router
		.clone()
		.oneshot(post_json(
			"/api/v1/auth/login",
			&json!({ "username": "alice", "password": "wonderland" }),
		))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	let login = body_json(response).await;
	let refresh_token = login["refresh_token"].as_str().unwrap();

	let response = server
		.router
		.clone()
		.oneshot(post_json("/api/v1/auth/refresh", &json!({ "refresh_token": refresh_token })))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	let refreshed = body_json(response).await;
	assert_eq!(refreshed["refresh_token"], refresh_token);
	assert_eq!(refreshed["username"], "alice");

	let access_token = refreshed["access_token"].as_str().unwrap();
	let response = server.router.oneshot(get("/api/v1/me", Some(access_token))).await.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_with_access_token_is_rejected() {
	let server = test_server().await;
	let response = server
		.router
		.clone()
		.oneshot(post_json(
			"/api/v1/auth/login",
			&json!({ "username": "alice", "password": "wonderland" }),
		))
		.await
		.unwrap();
	let access_token = body_json(response).await["access_token"].as_str().unwrap().to_string();

	let response = server
		.router
		.oneshot(post_json("/api/v1/auth/refresh", &json!({ "refresh_token": access_token })))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let body = body_json(response).await;
	assert_eq!(body["message"], "Invalid token. Not a refresh token.");
}

#[tokio::test(start_paused = true)]
async fn test_wrong_password_is_unauthorized() {
	let server = test_server().await;
	let response = server
		.router
		.oneshot(post_json(
			"/api/v1/auth/login",
			&json!({ "username": "alice", "password": "looking-glass" }),
		))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert_eq!(body_json(response).await["message"], "Invalid username or password.");
}

#[tokio::test]
async fn test_auth_endpoints_bypass_rate_limit() {
	let server = test_server().await;
	for _ in 0..12 {
		let response = server
			.router
			.clone()
			.oneshot(post_json(
				"/api/v1/auth/login",
				&json!({ "username": "alice", "password": "wonderland" }),
			))
			.await
			.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(header(&response, "x-ratelimit-limit"), None);
	}
}

// vim: ts=4
