//! Access + refresh token pair model.

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Bearer credential pair persisted by a token store.
///
/// Both secrets travel together: a pair is saved, rotated, and cleared atomically, so either
/// both tokens are present or the session is logged out. The serde field names double as the
/// wire format (`{"accessToken": ..., "refreshToken": ...}`) and the file-store keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
	/// Short-lived bearer credential attached to API calls.
	pub access_token: TokenSecret,
	/// Longer-lived credential used to mint a new access token.
	pub refresh_token: TokenSecret,
}
impl TokenPair {
	/// Builds a pair from the provided secrets.
	pub fn new(access: impl Into<TokenSecret>, refresh: impl Into<TokenSecret>) -> Self {
		Self { access_token: access.into(), refresh_token: refresh.into() }
	}
}
