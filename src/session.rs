//! Authenticated request session with transparent single-flight token refresh.

pub mod refresh;

pub use refresh::RefreshMetrics;

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	error::{ConfigError, HttpError, TransportError},
	http::ReqwestHttpClient,
	obs::{self, CallKind, CallOutcome, CallSpan},
	session::refresh::RefreshGate,
	store::TokenStore,
};

/// Issues authenticated requests against a REST backend.
///
/// The session owns the HTTP client, the token store, and the base URL so endpoint bindings
/// can focus on their resource shapes. Every request attaches the stored bearer token; a 401
/// triggers at most one token refresh (shared by all concurrent 401 observers) and one retry.
///
/// Cloning a session is cheap and shares the store and the refresh gate, so clones still
/// de-duplicate refresh calls among themselves. Independent sessions carry independent gates
/// and never interfere.
#[derive(Clone)]
pub struct Session {
	/// HTTP client wrapper used for every outbound request.
	pub http_client: ReqwestHttpClient,
	/// Token store that persists the session's credential pair.
	pub store: Arc<dyn TokenStore>,
	/// Shared metrics recorder for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
	base: Url,
	refresh_gate: Arc<RefreshGate>,
}
impl Session {
	/// Creates a session with the crate's default reqwest transport.
	pub fn new(base_url: Url, store: Arc<dyn TokenStore>) -> Self {
		Self::with_http_client(base_url, store, ReqwestHttpClient::default())
	}

	/// Creates a session that reuses a caller-provided transport.
	pub fn with_http_client(
		base_url: Url,
		store: Arc<dyn TokenStore>,
		http_client: ReqwestHttpClient,
	) -> Self {
		Self {
			http_client,
			store,
			refresh_metrics: Default::default(),
			base: base_url,
			refresh_gate: Default::default(),
		}
	}

	/// Returns the base URL all endpoint paths are resolved against.
	pub fn base_url(&self) -> &Url {
		&self.base
	}

	/// Builds an endpoint URL by appending percent-encoded path segments to the base.
	pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
		let mut url = self.base.clone();

		url.path_segments_mut()
			.map_err(|()| ConfigError::BaseUrl)?
			.pop_if_empty()
			.extend(segments);

		Ok(url)
	}

	/// Executes a plan and deserializes the 2xx JSON body into `T`.
	pub(crate) async fn call<T>(&self, plan: RequestPlan) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let (status, bytes) = self.call_raw(plan).await?;
		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);

		serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::Decode { source, status: status.as_u16() })
	}

	/// Executes a plan, discarding any response body.
	pub(crate) async fn call_unit(&self, plan: RequestPlan) -> Result<()> {
		self.call_raw(plan).await.map(|_| ())
	}

	/// Executes a plan and returns the raw 2xx body bytes.
	pub(crate) async fn call_bytes(&self, plan: RequestPlan) -> Result<Vec<u8>> {
		self.call_raw(plan).await.map(|(_, bytes)| bytes)
	}

	async fn call_raw(&self, plan: RequestPlan) -> Result<(StatusCode, Vec<u8>)> {
		const KIND: CallKind = CallKind::Request;

		let span = CallSpan::new(KIND, plan.op);

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span.instrument(self.execute(plan)).await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	async fn execute(&self, plan: RequestPlan) -> Result<(StatusCode, Vec<u8>)> {
		let pair = self.store.load().await?;
		// Snapshot before dispatching so a 401 joins any refresh that settles in between
		// instead of starting a second exchange.
		let observed_epoch = self.refresh_gate.epoch();
		let mut response =
			self.dispatch(&plan, pair.as_ref().map(|pair| &pair.access_token)).await?;

		if response.status() == StatusCode::UNAUTHORIZED && pair.is_some() {
			let fresh = self.refresh_access_token_since(observed_epoch).await?;

			// Retry once with the fresh token; a second 401 surfaces as a normal failure.
			response = self.dispatch(&plan, Some(&fresh)).await?;
		}

		let status = response.status();
		let bytes = response.bytes().await.map_err(TransportError::from)?.to_vec();

		if !status.is_success() {
			return Err(HttpError::from_body(status.as_u16(), &bytes).into());
		}

		Ok((status, bytes))
	}

	async fn dispatch(
		&self,
		plan: &RequestPlan,
		access: Option<&TokenSecret>,
	) -> Result<reqwest::Response> {
		let mut builder = self.http_client.request(plan.method.clone(), plan.url.clone());

		if let Some(token) = access {
			builder = builder.bearer_auth(token.expose());
		}

		builder = match &plan.body {
			RequestBody::Empty => builder,
			RequestBody::Json(value) => builder.json(value),
			RequestBody::Multipart(payload) => builder.multipart(payload.to_form()?),
		};

		builder.send().await.map_err(|e| Error::from(TransportError::from(e)))
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Session").field("base", &self.base.as_str()).finish()
	}
}

/// Replayable description of a single request.
///
/// The plan owns everything needed to rebuild the request, so the retry that follows a token
/// refresh can re-issue it, including multipart uploads, whose bytes stay buffered here.
#[derive(Clone, Debug)]
pub(crate) struct RequestPlan {
	op: &'static str,
	method: Method,
	url: Url,
	body: RequestBody,
}
impl RequestPlan {
	pub(crate) fn new(op: &'static str, method: Method, url: Url) -> Self {
		Self { op, method, url, body: RequestBody::Empty }
	}

	pub(crate) fn json(
		op: &'static str,
		method: Method,
		url: Url,
		body: &impl Serialize,
	) -> Result<Self> {
		let value =
			serde_json::to_value(body).map_err(|e| ConfigError::RequestBody { source: e })?;

		Ok(Self { op, method, url, body: RequestBody::Json(value) })
	}

	pub(crate) fn multipart(
		op: &'static str,
		method: Method,
		url: Url,
		payload: MultipartPayload,
	) -> Self {
		Self { op, method, url, body: RequestBody::Multipart(payload) }
	}
}

#[derive(Clone, Debug)]
enum RequestBody {
	Empty,
	Json(serde_json::Value),
	Multipart(MultipartPayload),
}

/// Buffered multipart payload that can be rebuilt for the post-refresh retry.
#[derive(Clone)]
pub(crate) struct MultipartPayload {
	pub file_name: String,
	pub mime_type: String,
	pub bytes: Vec<u8>,
	pub fields: Vec<(&'static str, String)>,
}
impl MultipartPayload {
	fn to_form(&self) -> Result<reqwest::multipart::Form> {
		let part = reqwest::multipart::Part::bytes(self.bytes.clone())
			.file_name(self.file_name.clone())
			.mime_str(&self.mime_type)
			.map_err(ConfigError::upload)?;
		let mut form = reqwest::multipart::Form::new().part("file", part);

		for (name, value) in &self.fields {
			form = form.text(*name, value.clone());
		}

		Ok(form)
	}
}
impl Debug for MultipartPayload {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MultipartPayload")
			.field("file_name", &self.file_name)
			.field("mime_type", &self.mime_type)
			.field("bytes", &self.bytes.len())
			.field("fields", &self.fields)
			.finish()
	}
}
