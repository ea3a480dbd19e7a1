//! Session-level error types shared across the request path, stores, and endpoint bindings.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical session error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Backend rejected the request with a non-2xx status.
	#[error(transparent)]
	Http(#[from] HttpError),

	/// Successful response carried a body that could not be deserialized.
	#[error("Response body could not be deserialized.")]
	Decode {
		/// Structured parsing failure naming the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the response.
		status: u16,
	},
	/// The in-flight token refresh this request joined (or started) failed.
	///
	/// Every request that observed the same 401 wave receives the same shared failure.
	#[error("Token refresh failed.")]
	Refresh {
		/// Underlying refresh failure, shared across all joined callers.
		#[source]
		source: Arc<Error>,
	},
}

/// Typed non-2xx response error carrying the server-provided message.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("API request failed with status {status}: {message}")]
pub struct HttpError {
	/// HTTP status code returned by the backend.
	pub status: u16,
	/// Server-provided `message` field, or a generic status message.
	pub message: String,
}
impl HttpError {
	/// Builds an error from a non-2xx response body.
	///
	/// The body is parsed defensively: anything that is not a JSON object with a string
	/// `message` field falls back to a generic HTTP-status message.
	pub fn from_body(status: u16, body: &[u8]) -> Self {
		let parsed: serde_json::Value = serde_json::from_slice(body).unwrap_or_default();
		let message = parsed
			.get("message")
			.and_then(serde_json::Value::as_str)
			.map(str::to_owned)
			.unwrap_or_else(|| format!("HTTP status {status}"));

		Self { status, message }
	}
}

/// Configuration and validation failures raised by the session.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Base URL cannot be extended with path segments (`cannot-be-a-base` URL).
	#[error("Base URL cannot be extended with path segments.")]
	BaseUrl,
	/// Request body failed to serialize to JSON.
	#[error("Request body could not be serialized.")]
	RequestBody {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},
	/// Multipart upload payload could not be constructed.
	#[error("Upload payload could not be constructed.")]
	Upload {
		/// Underlying payload builder failure.
		#[source]
		source: BoxError,
	},
	/// No refresh token is available for an operation that requires one.
	#[error("No refresh token is available.")]
	MissingRefreshToken,
}
impl ConfigError {
	/// Wraps an upload payload builder failure inside [`ConfigError`].
	pub fn upload(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Upload { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
