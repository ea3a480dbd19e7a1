// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
// self
use bearer_session::{
	auth::TokenPair,
	error::Error,
	session::Session,
	store::MemoryStore,
	url::Url,
};

fn base_url(server: &MockServer) -> Url {
	Url::parse(&server.url("/api")).expect("Mock server base URL should parse.")
}

fn logged_in_session(server: &MockServer, access: &str, refresh: &str) -> (Session, Arc<MemoryStore>) {
	let store = Arc::new(MemoryStore::with_pair(TokenPair::new(access, refresh)));
	let session = Session::new(base_url(server), store.clone());

	(session, store)
}

fn logged_out_session(server: &MockServer) -> (Session, Arc<MemoryStore>) {
	let store = Arc::new(MemoryStore::default());
	let session = Session::new(base_url(server), store.clone());

	(session, store)
}

const USER_BODY: &str = r#"{"id":"u-1","email":"dev@example.com","name":"Dev","role":"member"}"#;

#[tokio::test]
async fn attaches_bearer_token_and_parses_json() {
	let server = MockServer::start_async().await;
	let (session, _) = logged_in_session(&server, "access-1", "refresh-1");
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/me").header("authorization", "Bearer access-1");
			then.status(200).header("content-type", "application/json").body(USER_BODY);
		})
		.await;
	let user = session.current_user().await.expect("Authenticated request should succeed.");

	mock.assert_async().await;

	assert_eq!(user.id, "u-1");
	assert_eq!(user.email, "dev@example.com");
}

#[tokio::test]
async fn omits_authorization_header_when_logged_out() {
	let server = MockServer::start_async().await;
	let (session, _) = logged_out_session(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/me").header_missing("authorization");
			then.status(200).header("content-type", "application/json").body(USER_BODY);
		})
		.await;

	session
		.current_user()
		.await
		.expect("Anonymous request should still reach the backend without a bearer header.");

	mock.assert_async().await;
}

#[tokio::test]
async fn logged_out_401_fails_immediately_without_refresh() {
	let server = MockServer::start_async().await;
	let (session, _) = logged_out_session(&server);
	let unauthorized = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/me");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"message":"unauthorized"}"#);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/refresh");
			then.status(200);
		})
		.await;
	let err = session
		.current_user()
		.await
		.expect_err("A 401 without stored tokens should surface immediately.");

	unauthorized.assert_async().await;
	refresh.assert_calls_async(0).await;

	match err {
		Error::Http(inner) => {
			assert_eq!(inner.status, 401);
			assert_eq!(inner.message, "unauthorized");
		},
		other => panic!("Expected an HTTP error, got: {other:?}"),
	}
}

#[tokio::test]
async fn non_2xx_surfaces_server_message() {
	let server = MockServer::start_async().await;
	let (session, _) = logged_in_session(&server, "access-1", "refresh-1");
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/me");
			then.status(403)
				.header("content-type", "application/json")
				.body(r#"{"message":"insufficient permissions"}"#);
		})
		.await;
	let err = session.current_user().await.expect_err("A 403 should surface as an error.");

	mock.assert_async().await;

	match err {
		Error::Http(inner) => {
			assert_eq!(inner.status, 403);
			assert_eq!(inner.message, "insufficient permissions");
		},
		other => panic!("Expected an HTTP error, got: {other:?}"),
	}
}

#[tokio::test]
async fn malformed_error_body_falls_back_to_status_message() {
	let server = MockServer::start_async().await;
	let (session, _) = logged_in_session(&server, "access-1", "refresh-1");
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/me");
			then.status(500).body("gateway exploded");
		})
		.await;
	let err = session
		.current_user()
		.await
		.expect_err("A 500 with a non-JSON body should surface as an error.");

	mock.assert_async().await;

	match err {
		Error::Http(inner) => {
			assert_eq!(inner.status, 500);
			assert_eq!(inner.message, "HTTP status 500");
		},
		other => panic!("Expected an HTTP error, got: {other:?}"),
	}
}

#[tokio::test]
async fn mismatched_success_body_surfaces_decode_error() {
	let server = MockServer::start_async().await;
	let (session, _) = logged_in_session(&server, "access-1", "refresh-1");
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/me");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"unexpected":true}"#);
		})
		.await;
	let err = session
		.current_user()
		.await
		.expect_err("A mismatched body should surface a decode error.");

	mock.assert_async().await;

	assert!(matches!(err, Error::Decode { status: 200, .. }));
}

#[tokio::test]
async fn second_401_after_refresh_surfaces_without_another_refresh() {
	let server = MockServer::start_async().await;
	let (session, _) = logged_in_session(&server, "access-stale", "refresh-stale");
	let stale = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/auth/me")
				.header("authorization", "Bearer access-stale");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"message":"token expired"}"#);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/refresh");
			then.status(200).header("content-type", "application/json").body(
				r#"{"tokens":{"accessToken":"access-fresh","refreshToken":"refresh-fresh"}}"#,
			);
		})
		.await;
	// The backend rejects even the fresh token; the retry must not refresh again.
	let fresh = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/auth/me")
				.header("authorization", "Bearer access-fresh");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"message":"still unauthorized"}"#);
		})
		.await;
	let err = session
		.current_user()
		.await
		.expect_err("A 401 on the retried request should surface as a normal failure.");

	stale.assert_async().await;
	refresh.assert_calls_async(1).await;
	fresh.assert_async().await;

	match err {
		Error::Http(inner) => {
			assert_eq!(inner.status, 401);
			assert_eq!(inner.message, "still unauthorized");
		},
		other => panic!("Expected an HTTP error, got: {other:?}"),
	}
}
