//! Transport primitives for the session request path.

// std
use std::ops::Deref;
// self
use crate::_prelude::*;

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// The session reuses one client for every outbound request, including token refresh calls.
/// Callers that need custom transport behavior (proxies, self-signed certificates in tests,
/// connection tuning) build their own [`ReqwestClient`] and wrap it here.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Starts a request builder for the provided method and URL.
	pub(crate) fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
		self.0.request(method, url)
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}
