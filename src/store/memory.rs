//! Thread-safe in-memory [`TokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::TokenPair,
	store::{StoreError, StoreFuture, TokenStore},
};

type StoreSlot = Arc<RwLock<Option<TokenPair>>>;

/// Thread-safe storage backend that keeps the pair in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreSlot);
impl MemoryStore {
	/// Creates a store pre-seeded with the provided pair.
	pub fn with_pair(pair: TokenPair) -> Self {
		Self(Arc::new(RwLock::new(Some(pair))))
	}

	fn load_now(slot: StoreSlot) -> Option<TokenPair> {
		slot.read().clone()
	}

	fn save_now(slot: StoreSlot, pair: TokenPair) -> Result<(), StoreError> {
		*slot.write() = Some(pair);

		Ok(())
	}

	fn clear_now(slot: StoreSlot) -> Result<(), StoreError> {
		*slot.write() = None;

		Ok(())
	}
}
impl TokenStore for MemoryStore {
	fn load(&self) -> StoreFuture<'_, Option<TokenPair>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(Self::load_now(slot)) })
	}

	fn save(&self, pair: TokenPair) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move { Self::save_now(slot, pair) })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move { Self::clear_now(slot) })
	}
}
