//! Project listing, membership, and file bindings.

// self
use crate::{
	_prelude::*,
	api::{Paginated, SortOrder},
	session::{RequestPlan, Session},
};

/// Project summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
	/// Project identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Free-form description.
	pub description: String,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last-modified instant.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
	/// Identifier of the owning account.
	pub owner_id: String,
	/// Number of members.
	pub member_count: u64,
	/// Number of stored files.
	pub file_count: u64,
}

/// Membership role within a project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
	/// Project owner.
	Owner,
	/// Administrator.
	Admin,
	/// Regular member.
	Member,
	/// Read-only viewer.
	Viewer,
}

/// Project membership entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMember {
	/// Membership identifier.
	pub id: String,
	/// Owning project.
	pub project_id: String,
	/// Member's account identifier.
	pub user_id: String,
	/// Member's display name.
	pub user_name: String,
	/// Member's email.
	pub user_email: String,
	/// Membership role.
	pub role: ProjectRole,
	/// Join instant.
	#[serde(with = "time::serde::rfc3339")]
	pub joined_at: OffsetDateTime,
}

/// File stored under a project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
	/// File identifier.
	pub id: String,
	/// Owning project.
	pub project_id: String,
	/// File name.
	pub name: String,
	/// Size in bytes.
	pub size: u64,
	/// MIME type reported at upload time.
	pub mime_type: String,
	/// Uploader's account identifier.
	pub uploaded_by: String,
	/// Upload instant.
	#[serde(with = "time::serde::rfc3339")]
	pub uploaded_at: OffsetDateTime,
	/// Download URL.
	pub url: String,
}

/// Sort keys accepted by the project listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectSortKey {
	/// Sort by display name.
	Name,
	/// Sort by creation instant.
	CreatedAt,
	/// Sort by last-modified instant.
	UpdatedAt,
}
impl ProjectSortKey {
	/// Returns the query-parameter value.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProjectSortKey::Name => "name",
			ProjectSortKey::CreatedAt => "createdAt",
			ProjectSortKey::UpdatedAt => "updatedAt",
		}
	}
}

/// Query parameters for the project listing; unset fields are omitted.
#[derive(Clone, Debug, Default)]
pub struct ProjectListParams {
	/// 1-based page number.
	pub page: Option<u32>,
	/// Page size.
	pub limit: Option<u32>,
	/// Free-text search filter.
	pub search: Option<String>,
	/// Sort key.
	pub sort_by: Option<ProjectSortKey>,
	/// Sort direction.
	pub sort_order: Option<SortOrder>,
}
impl ProjectListParams {
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

	/// Sets the sort key and direction.
	pub fn with_sort(mut self, key: ProjectSortKey, order: SortOrder) -> Self {
		self.sort_by = Some(key);
		self.sort_order = Some(order);

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
		if let Some(sort_by) = self.sort_by {
			pairs.push(("sortBy", sort_by.as_str().to_owned()));
		}
		if let Some(sort_order) = self.sort_order {
			pairs.push(("sortOrder", sort_order.as_str().to_owned()));
		}
		if !pairs.is_empty() {
			url.query_pairs_mut().extend_pairs(pairs);
		}
	}
}

impl Session {
	/// Lists projects visible to the current account.
	pub async fn projects(&self, params: &ProjectListParams) -> Result<Paginated<Project>> {
		let mut url = self.endpoint(&["projects"])?;

		params.append_query(&mut url);

		self.call(RequestPlan::new("projects", Method::GET, url)).await
	}

	/// Fetches a single project.
	pub async fn project(&self, project_id: &str) -> Result<Project> {
		let url = self.endpoint(&["projects", project_id])?;

		self.call(RequestPlan::new("project", Method::GET, url)).await
	}

	/// Lists the members of a project.
	pub async fn project_members(&self, project_id: &str) -> Result<Vec<ProjectMember>> {
		let url = self.endpoint(&["projects", project_id, "members"])?;

		self.call(RequestPlan::new("project_members", Method::GET, url)).await
	}

	/// Lists the files stored under a project.
	pub async fn project_files(&self, project_id: &str) -> Result<Vec<ProjectFile>> {
		let url = self.endpoint(&["projects", project_id, "files"])?;

		self.call(RequestPlan::new("project_files", Method::GET, url)).await
	}
}
