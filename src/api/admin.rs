//! Administration bindings: user management and roles.

// self
use crate::{
	_prelude::*,
	api::Paginated,
	session::{RequestPlan, Session},
};

/// Account lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
	/// Account is active.
	Active,
	/// Account has been deactivated.
	Inactive,
	/// Invitation sent but not yet accepted.
	Pending,
}
impl UserStatus {
	/// Returns the query-parameter value.
	pub const fn as_str(self) -> &'static str {
		match self {
			UserStatus::Active => "active",
			UserStatus::Inactive => "inactive",
			UserStatus::Pending => "pending",
		}
	}
}

/// Account as seen by administrators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
	/// Account identifier.
	pub id: String,
	/// Account email.
	pub email: String,
	/// Display name.
	pub name: String,
	/// Role label.
	pub role: String,
	/// Lifecycle status.
	pub status: UserStatus,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Most recent login instant, if the account ever logged in.
	#[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub last_login_at: Option<OffsetDateTime>,
}

/// Assignable role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
	/// Role identifier.
	pub id: String,
	/// Role label.
	pub name: String,
	/// Human-readable description.
	pub description: String,
	/// Permission strings granted by the role.
	pub permissions: Vec<String>,
}

/// Payload for inviting a new account.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteUser {
	/// Invitee email.
	pub email: String,
	/// Invitee display name.
	pub name: String,
	/// Role to assign on acceptance.
	pub role: String,
}

/// Payload for changing an account's role.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRole {
	/// New role label.
	pub role: String,
}

/// Query parameters for the admin user listing; unset fields are omitted.
#[derive(Clone, Debug, Default)]
pub struct UserListParams {
	/// 1-based page number.
	pub page: Option<u32>,
	/// Page size.
	pub limit: Option<u32>,
	/// Free-text search filter.
	pub search: Option<String>,
	/// Role filter.
	pub role: Option<String>,
	/// Status filter.
	pub status: Option<UserStatus>,
}
impl UserListParams {
	/// Overrides the page number.
	pub fn with_page(mut self, page: u32) -> Self {
		self.page = Some(page);

		self
	}

	/// Overrides the page size.
	pub fn with_limit(mut self, limit: u32) -> Self {
		self.limit = Some(limit);

		self
	}

	/// Sets the free-text search filter.
	pub fn with_search(mut self, search: impl Into<String>) -> Self {
		self.search = Some(search.into());

		self
	}

	/// Restricts the listing to one role.
	pub fn with_role(mut self, role: impl Into<String>) -> Self {
		self.role = Some(role.into());

		self
	}

	/// Restricts the listing to one lifecycle status.
	pub fn with_status(mut self, status: UserStatus) -> Self {
		self.status = Some(status);

		self
	}

	fn append_query(&self, url: &mut Url) {
		let mut pairs = Vec::new();

		if let Some(page) = self.page {
			pairs.push(("page", page.to_string()));
		}
		if let Some(limit) = self.limit {
			pairs.push(("limit", limit.to_string()));
		}
		if let Some(search) = &self.search {
			pairs.push(("search", search.clone()));
		}
		if let Some(role) = &self.role {
			pairs.push(("role", role.clone()));
		}
		if let Some(status) = self.status {
			pairs.push(("status", status.as_str().to_owned()));
		}
		if !pairs.is_empty() {
			url.query_pairs_mut().extend_pairs(pairs);
		}
	}
}

impl Session {
	/// Lists accounts; requires an administrator token.
	pub async fn users(&self, params: &UserListParams) -> Result<Paginated<AdminUser>> {
		let mut url = self.endpoint(&["admin", "users"])?;

		params.append_query(&mut url);

		self.call(RequestPlan::new("users", Method::GET, url)).await
	}

	/// Lists assignable roles.
	pub async fn roles(&self) -> Result<Vec<Role>> {
		let url = self.endpoint(&["admin", "roles"])?;

		self.call(RequestPlan::new("roles", Method::GET, url)).await
	}

	/// Invites a new account and returns it in `pending` status.
	pub async fn invite_user(&self, invite: &InviteUser) -> Result<AdminUser> {
		let url = self.endpoint(&["admin", "users", "invite"])?;

		self.call(RequestPlan::json("invite_user", Method::POST, url, invite)?).await
	}

	/// Changes an account's role and returns the updated account.
	pub async fn update_user_role(
		&self,
		user_id: &str,
		update: &UpdateUserRole,
	) -> Result<AdminUser> {
		let url = self.endpoint(&["admin", "users", user_id, "role"])?;

		self.call(RequestPlan::json("update_user_role", Method::PUT, url, update)?).await
	}
}
