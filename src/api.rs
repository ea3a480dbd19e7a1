//! Typed endpoint bindings layered over the session request path.
//!
//! Every binding routes through [`Session`](crate::session::Session)'s core plumbing, so all
//! of them inherit bearer attachment, single-flight refresh, and the one post-refresh retry.

pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod files;
pub mod messaging;
pub mod projects;
pub mod settings;

pub use admin::*;
pub use auth::*;
pub use dashboard::*;
pub use files::*;
pub use messaging::*;
pub use projects::*;
pub use settings::*;

// self
use crate::_prelude::*;

/// Standard pagination envelope returned by list endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
	/// Page of results.
	pub data: Vec<T>,
	/// Total number of matching items.
	pub total: u64,
	/// 1-based page number.
	pub page: u32,
	/// Page size the server applied.
	pub limit: u32,
	/// Total number of pages.
	pub total_pages: u32,
}

/// Sort direction accepted by list endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
	/// Ascending.
	Asc,
	/// Descending.
	Desc,
}
impl SortOrder {
	/// Returns the query-parameter value.
	pub const fn as_str(self) -> &'static str {
		match self {
			SortOrder::Asc => "asc",
			SortOrder::Desc => "desc",
		}
	}
}
