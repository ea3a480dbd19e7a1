// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use bearer_session::{
	auth::TokenPair,
	error::{ConfigError, Error},
	session::Session,
	store::{MemoryStore, TokenStore},
	url::Url,
};

const USER_BODY: &str = r#"{"id":"u-1","email":"dev@example.com","name":"Dev","role":"member"}"#;

fn session_with_store(server: &MockServer, pair: Option<TokenPair>) -> (Session, Arc<MemoryStore>) {
	let store = match pair {
		Some(pair) => Arc::new(MemoryStore::with_pair(pair)),
		None => Arc::new(MemoryStore::default()),
	};
	let base = Url::parse(&server.url("/api")).expect("Mock server base URL should parse.");
	let session = Session::new(base, store.clone());

	(session, store)
}

async fn stored_pair(store: &MemoryStore) -> Option<TokenPair> {
	store.load().await.expect("In-memory load should never fail.")
}

#[tokio::test]
async fn expired_token_is_refreshed_and_the_request_retried_once() {
	let server = MockServer::start_async().await;
	let (session, store) =
		session_with_store(&server, Some(TokenPair::new("access-stale", "refresh-stale")));
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
			when.method(POST)
				.path("/api/auth/refresh")
				.json_body(json!({ "refreshToken": "refresh-stale" }));
			then.status(200).header("content-type", "application/json").body(
				r#"{"tokens":{"accessToken":"access-fresh","refreshToken":"refresh-fresh"}}"#,
			);
		})
		.await;
	let fresh = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/auth/me")
				.header("authorization", "Bearer access-fresh");
			then.status(200).header("content-type", "application/json").body(USER_BODY);
		})
		.await;
	let user = session
		.current_user()
		.await
		.expect("The retried request should succeed with the rotated token.");

	stale.assert_async().await;
	refresh.assert_calls_async(1).await;
	fresh.assert_async().await;

	assert_eq!(user.id, "u-1");

	let pair = stored_pair(&store).await.expect("The rotated pair should be persisted.");

	assert_eq!(pair.access_token.expose(), "access-fresh");
	assert_eq!(pair.refresh_token.expose(), "refresh-fresh");
}

#[tokio::test]
async fn concurrent_401s_share_a_single_refresh() {
	let server = MockServer::start_async().await;
	let (session, store) =
		session_with_store(&server, Some(TokenPair::new("access-stale", "refresh-stale")));
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
			when.method(POST)
				.path("/api/auth/refresh")
				.json_body(json!({ "refreshToken": "refresh-stale" }));
			then.status(200).header("content-type", "application/json").body(
				r#"{"tokens":{"accessToken":"access-fresh","refreshToken":"refresh-fresh"}}"#,
			);
		})
		.await;
	let fresh = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/auth/me")
				.header("authorization", "Bearer access-fresh");
			then.status(200).header("content-type", "application/json").body(USER_BODY);
		})
		.await;
	// Both requests dispatch under the stale token before either observes a 401, so the
	// second caller must join the first caller's refresh instead of issuing its own.
	let (first, second) = tokio::join!(session.current_user(), session.current_user());

	stale.assert_calls_async(2).await;
	refresh.assert_calls_async(1).await;
	fresh.assert_calls_async(2).await;

	assert_eq!(first.expect("The first caller should succeed.").id, "u-1");
	assert_eq!(second.expect("The joining caller should succeed.").id, "u-1");
	assert_eq!(session.refresh_metrics.attempts(), 2);
	assert_eq!(session.refresh_metrics.successes(), 2);
	assert_eq!(session.refresh_metrics.failures(), 0);

	let pair = stored_pair(&store).await.expect("The rotated pair should be persisted.");

	assert_eq!(pair.access_token.expose(), "access-fresh");
}

#[tokio::test]
async fn failed_refresh_is_shared_and_clears_the_store() {
	let server = MockServer::start_async().await;
	let (session, store) =
		session_with_store(&server, Some(TokenPair::new("access-stale", "refresh-stale")));
	let _stale = server
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
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"message":"invalid refresh token"}"#);
		})
		.await;
	let (first, second) = tokio::join!(session.current_user(), session.current_user());

	refresh.assert_calls_async(1).await;

	for result in [first, second] {
		let err = result.expect_err("Both callers should observe the refresh failure.");

		match err {
			Error::Refresh { source } => match source.as_ref() {
				Error::Http(inner) => assert_eq!(inner.status, 401),
				other => panic!("Expected the shared HTTP failure, got: {other:?}"),
			},
			other => panic!("Expected a refresh error, got: {other:?}"),
		}
	}

	assert_eq!(session.refresh_metrics.failures(), 2);
	assert!(stored_pair(&store).await.is_none(), "A failed refresh should log the session out.");
}

#[tokio::test]
async fn explicit_refresh_rotates_the_stored_pair() {
	let server = MockServer::start_async().await;
	let (session, store) =
		session_with_store(&server, Some(TokenPair::new("access-stale", "refresh-stale")));
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/auth/refresh")
				.json_body(json!({ "refreshToken": "refresh-stale" }));
			then.status(200).header("content-type", "application/json").body(
				r#"{"tokens":{"accessToken":"access-fresh","refreshToken":"refresh-fresh"}}"#,
			);
		})
		.await;
	let access = session
		.refresh_access_token()
		.await
		.expect("An explicit refresh with a stored pair should succeed.");

	refresh.assert_async().await;

	assert_eq!(access.expose(), "access-fresh");

	let pair = stored_pair(&store).await.expect("The rotated pair should be persisted.");

	assert_eq!(pair.refresh_token.expose(), "refresh-fresh");
}

#[tokio::test]
async fn refresh_without_a_stored_pair_fails_before_the_network() {
	let server = MockServer::start_async().await;
	let (session, _) = session_with_store(&server, None);
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/refresh");
			then.status(200);
		})
		.await;
	let err = session
		.refresh_access_token()
		.await
		.expect_err("Refreshing without a refresh token should fail.");

	refresh.assert_calls_async(0).await;

	match err {
		Error::Refresh { source } => {
			assert!(matches!(
				source.as_ref(),
				Error::Config(ConfigError::MissingRefreshToken)
			));
		},
		other => panic!("Expected a refresh error, got: {other:?}"),
	}
}

#[tokio::test]
async fn a_later_expiry_starts_a_fresh_refresh() {
	let server = MockServer::start_async().await;
	let (session, _) =
		session_with_store(&server, Some(TokenPair::new("access-1", "refresh-1")));
	let stale_1 = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/me").header("authorization", "Bearer access-1");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"message":"token expired"}"#);
		})
		.await;
	let refresh_1 = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/auth/refresh")
				.json_body(json!({ "refreshToken": "refresh-1" }));
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"tokens":{"accessToken":"access-2","refreshToken":"refresh-2"}}"#);
		})
		.await;
	let mut fresh_1 = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/me").header("authorization", "Bearer access-2");
			then.status(200).header("content-type", "application/json").body(USER_BODY);
		})
		.await;

	session.current_user().await.expect("The first expiry should refresh and retry.");

	refresh_1.assert_calls_async(1).await;
	stale_1.assert_async().await;

	// The backend later expires the rotated token too; the next 401 wave must perform its
	// own refresh rather than reusing the settled outcome.
	fresh_1.delete_async().await;

	let _stale_2 = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/me").header("authorization", "Bearer access-2");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"message":"token expired"}"#);
		})
		.await;
	let refresh_2 = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/auth/refresh")
				.json_body(json!({ "refreshToken": "refresh-2" }));
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"tokens":{"accessToken":"access-3","refreshToken":"refresh-3"}}"#);
		})
		.await;
	let _fresh_2 = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/me").header("authorization", "Bearer access-3");
			then.status(200).header("content-type", "application/json").body(USER_BODY);
		})
		.await;

	session.current_user().await.expect("The second expiry should refresh again.");

	refresh_1.assert_calls_async(1).await;
	refresh_2.assert_calls_async(1).await;
}
