//! Dashboard summary bindings.

// self
use crate::{
	_prelude::*,
	session::{RequestPlan, Session},
};

/// Headline counters shown on the dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
	/// Total projects visible to the account.
	pub projects_count: u64,
	/// Unread messages across all channels.
	pub unread_messages_count: u64,
	/// Projects with recent activity.
	pub active_projects_count: u64,
}

/// Kind of a recent-activity entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
	/// A project was created.
	ProjectCreated,
	/// A message was sent.
	MessageSent,
	/// A file was uploaded.
	FileUploaded,
	/// An account joined a project.
	MemberJoined,
}

/// Recent-activity feed entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivity {
	/// Entry identifier.
	pub id: String,
	/// Entry kind.
	#[serde(rename = "type")]
	pub kind: ActivityKind,
	/// Human-readable description.
	pub description: String,
	/// Instant the activity happened.
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
	/// Acting account's identifier.
	pub user_id: String,
	/// Acting account's display name.
	pub user_name: String,
}

/// Dashboard payload: counters plus the recent-activity feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
	/// Headline counters.
	pub stats: DashboardStats,
	/// Recent-activity feed, newest first.
	pub recent_activities: Vec<RecentActivity>,
}

impl Session {
	/// Fetches the dashboard summary for the current account.
	pub async fn dashboard(&self) -> Result<DashboardData> {
		let url = self.endpoint(&["dashboard"])?;

		self.call(RequestPlan::new("dashboard", Method::GET, url)).await
	}
}
