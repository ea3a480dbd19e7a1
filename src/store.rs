//! Storage contracts and built-in store implementations for session token pairs.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::TokenPair};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for session token pairs.
///
/// A store holds at most one pair; saving replaces it and clearing removes it. The
/// both-or-neither token invariant is structural; there is no way to persist half a pair.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Returns the stored pair, if the session is logged in.
	fn load(&self) -> StoreFuture<'_, Option<TokenPair>>;

	/// Persists or replaces the stored pair.
	fn save(&self, pair: TokenPair) -> StoreFuture<'_, ()>;

	/// Removes the stored pair, logging the session out.
	fn clear(&self) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
