//! Login, logout, and current-user bindings.

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, TokenSecret},
	session::{RequestPlan, Session},
};

/// Login request payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
	/// Account email.
	pub email: String,
	/// Account password; redacted in `Debug` output.
	pub password: TokenSecret,
}
impl Credentials {
	/// Builds credentials from the provided email and password.
	pub fn new(email: impl Into<String>, password: impl Into<TokenSecret>) -> Self {
		Self { email: email.into(), password: password.into() }
	}
}

/// Authenticated account as returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	/// Account identifier.
	pub id: String,
	/// Account email.
	pub email: String,
	/// Display name.
	pub name: String,
	/// Role label.
	pub role: String,
}

/// Response of a successful login: the account plus its freshly minted pair.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
	/// Authenticated account.
	pub user: User,
	/// Freshly minted token pair.
	pub tokens: TokenPair,
}

impl Session {
	/// Logs in and persists the returned token pair in the session's store.
	pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse> {
		let url = self.endpoint(&["auth", "login"])?;
		let response: AuthResponse =
			self.call(RequestPlan::json("login", Method::POST, url, credentials)?).await?;

		self.store.save(response.tokens.clone()).await?;

		Ok(response)
	}

	/// Logs out: notifies the backend, then clears the stored pair.
	///
	/// The store is cleared even when the backend call fails; the call's error is still
	/// returned so callers can log it.
	pub async fn logout(&self) -> Result<()> {
		let url = self.endpoint(&["auth", "logout"])?;
		let result = self.call_unit(RequestPlan::new("logout", Method::POST, url)).await;

		self.store.clear().await?;

		result
	}

	/// Fetches the account tied to the current access token.
	pub async fn current_user(&self) -> Result<User> {
		let url = self.endpoint(&["auth", "me"])?;

		self.call(RequestPlan::new("current_user", Method::GET, url)).await
	}
}
