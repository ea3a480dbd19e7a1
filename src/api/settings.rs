//! Profile and API key settings bindings.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	session::{RequestPlan, Session},
};

/// Profile of the current account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
	/// Account identifier.
	pub id: String,
	/// Account email.
	pub email: String,
	/// Display name.
	pub name: String,
	/// Role label.
	pub role: String,
	/// Avatar URL, if one is set.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar: Option<String>,
	/// Free-form biography.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bio: Option<String>,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

/// Partial profile update; unset fields are left unchanged by the backend.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
	/// New display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New biography.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub bio: Option<String>,
	/// New avatar URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar: Option<String>,
}

/// API key issued for programmatic access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
	/// Key identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Key material; redacted in `Debug` output.
	pub key: TokenSecret,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Most recent use, if the key has ever been used.
	#[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub last_used_at: Option<OffsetDateTime>,
	/// Expiry instant, if the key expires.
	#[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub expires_at: Option<OffsetDateTime>,
}

/// Payload for minting a new API key.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKey {
	/// Display name for the key.
	pub name: String,
	/// Lifetime in days; omit for a non-expiring key.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub expires_in_days: Option<u32>,
}

impl Session {
	/// Fetches the current account's profile.
	pub async fn profile(&self) -> Result<UserProfile> {
		let url = self.endpoint(&["settings", "profile"])?;

		self.call(RequestPlan::new("profile", Method::GET, url)).await
	}

	/// Applies a partial profile update and returns the updated profile.
	pub async fn update_profile(&self, update: &UpdateProfile) -> Result<UserProfile> {
		let url = self.endpoint(&["settings", "profile"])?;

		self.call(RequestPlan::json("update_profile", Method::PUT, url, update)?).await
	}

	/// Lists the current account's API keys.
	pub async fn api_keys(&self) -> Result<Vec<ApiKey>> {
		let url = self.endpoint(&["settings", "api-keys"])?;

		self.call(RequestPlan::new("api_keys", Method::GET, url)).await
	}

	/// Mints a new API key; the key material is only returned by this call.
	pub async fn create_api_key(&self, create: &CreateApiKey) -> Result<ApiKey> {
		let url = self.endpoint(&["settings", "api-keys"])?;

		self.call(RequestPlan::json("create_api_key", Method::POST, url, create)?).await
	}

	/// Revokes an API key.
	pub async fn delete_api_key(&self, key_id: &str) -> Result<()> {
		let url = self.endpoint(&["settings", "api-keys", key_id])?;

		self.call_unit(RequestPlan::new("delete_api_key", Method::DELETE, url)).await
	}
}
