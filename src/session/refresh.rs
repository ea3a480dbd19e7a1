//! Single-flight token refresh.
//!
//! The session exposes [`Session::refresh_access_token`] so callers can rotate the stored
//! pair eagerly, but the usual entry point is the 401 path in the request plumbing. Either
//! way the refresh gate guarantees that logically-concurrent callers share one
//! `POST /auth/refresh` exchange: the first caller performs it, everyone who observed the
//! same 401 wave awaits and reuses its outcome. A successful exchange persists the rotated
//! pair before the gate settles; a failed one clears the store, so dependent retries always
//! observe final state.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret},
	error::{ConfigError, HttpError, TransportError},
	obs::{self, CallKind, CallOutcome, CallSpan},
	session::Session,
};

/// Wire envelope returned by the refresh endpoint.
#[derive(Deserialize)]
struct RefreshResponse {
	tokens: TokenPair,
}

/// Per-session single-flight state.
///
/// Lives inside the session instance (never module-level) so independent sessions, e.g. in
/// tests, cannot interfere with each other's refresh cycles.
#[derive(Debug, Default)]
pub(crate) struct RefreshGate {
	flight: AsyncMutex<()>,
	state: Mutex<GateState>,
}
#[derive(Debug, Default)]
struct GateState {
	epoch: u64,
	outcome: Option<Result<TokenPair, Arc<Error>>>,
}
impl RefreshGate {
	/// Returns the current epoch; callers snapshot it before dispatching a request.
	pub(crate) fn epoch(&self) -> u64 {
		self.state.lock().epoch
	}

	/// Returns the recorded outcome if a refresh settled after the provided epoch.
	fn settled_since(&self, epoch: u64) -> Option<Result<TokenPair, Arc<Error>>> {
		let state = self.state.lock();

		if state.epoch == epoch { None } else { state.outcome.clone() }
	}

	/// Publishes an outcome and advances the epoch so later 401 waves refresh anew.
	fn settle(&self, outcome: Result<TokenPair, Arc<Error>>) {
		let mut state = self.state.lock();

		state.epoch = state.epoch.wrapping_add(1);
		state.outcome = Some(outcome);
	}
}

impl Session {
	/// Refreshes the stored token pair and returns the new access token.
	///
	/// Concurrent calls are de-duplicated: callers that arrive while an exchange is in
	/// flight await it and receive the same rotated token (or the same shared
	/// [`Error::Refresh`]). A failed exchange clears the store.
	pub async fn refresh_access_token(&self) -> Result<TokenSecret> {
		let observed_epoch = self.refresh_gate.epoch();

		self.refresh_access_token_since(observed_epoch).await
	}

	/// Refresh entry point used by the 401 path; `observed_epoch` is the gate epoch
	/// snapshotted before the original request was dispatched.
	pub(crate) async fn refresh_access_token_since(
		&self,
		observed_epoch: u64,
	) -> Result<TokenSecret> {
		const KIND: CallKind = CallKind::Refresh;

		let span = CallSpan::new(KIND, "refresh_access_token");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.refresh_metrics.record_attempt();

				let _flight = self.refresh_gate.flight.lock().await;

				if let Some(outcome) = self.refresh_gate.settled_since(observed_epoch) {
					// A refresh settled after this caller's snapshot; share its outcome
					// instead of issuing a second exchange.
					return match outcome {
						Ok(pair) => {
							self.refresh_metrics.record_success();

							Ok(pair.access_token)
						},
						Err(shared) => {
							self.refresh_metrics.record_failure();

							Err(Error::Refresh { source: shared })
						},
					};
				}

				match self.perform_refresh().await {
					Ok(pair) => {
						self.refresh_gate.settle(Ok(pair.clone()));
						self.refresh_metrics.record_success();

						Ok(pair.access_token)
					},
					Err(err) => {
						let shared = Arc::new(err);

						self.refresh_gate.settle(Err(shared.clone()));
						self.refresh_metrics.record_failure();

						Err(Error::Refresh { source: shared })
					},
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	async fn perform_refresh(&self) -> Result<TokenPair> {
		let refresh = self
			.store
			.load()
			.await?
			.map(|pair| pair.refresh_token)
			.ok_or(Error::Config(ConfigError::MissingRefreshToken))?;
		let pair = match self.exchange(&refresh).await {
			Ok(pair) => pair,
			Err(err) => {
				// An unusable refresh token means the session is over; leave the store
				// logged out before propagating.
				let _ = self.store.clear().await;

				return Err(err);
			},
		};

		self.store.save(pair.clone()).await?;

		Ok(pair)
	}

	async fn exchange(&self, refresh: &TokenSecret) -> Result<TokenPair> {
		let url = self.endpoint(&["auth", "refresh"])?;
		let body = serde_json::json!({ "refreshToken": refresh.expose() });
		let response = self
			.http_client
			.request(Method::POST, url)
			.json(&body)
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();
		let bytes = response.bytes().await.map_err(TransportError::from)?;

		if !status.is_success() {
			return Err(HttpError::from_body(status.as_u16(), &bytes).into());
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
		let envelope: RefreshResponse = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::Decode { source, status: status.as_u16() })?;

		Ok(envelope.tokens)
	}
}
