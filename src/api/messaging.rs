//! Channel and message bindings.

// self
use crate::{
	_prelude::*,
	api::Paginated,
	session::{RequestPlan, Session},
};

/// Messaging channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
	/// Channel identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Optional description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Owning project, when the channel is project-scoped.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub project_id: Option<String>,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Instant of the most recent message, if any.
	#[serde(default, with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
	pub last_message_at: Option<OffsetDateTime>,
	/// Number of unread messages for the current account.
	pub unread_count: u64,
}

/// Message within a channel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
	/// Message identifier.
	pub id: String,
	/// Owning channel.
	pub channel_id: String,
	/// Message body.
	pub content: String,
	/// Sender's account identifier.
	pub sender_id: String,
	/// Sender's display name.
	pub sender_name: String,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	/// Last-edit instant.
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
	/// Attachments, if any.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub attachments: Vec<MessageAttachment>,
}

/// File attached to a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAttachment {
	/// Attachment identifier.
	pub id: String,
	/// Owning message.
	pub message_id: String,
	/// File name.
	pub file_name: String,
	/// Size in bytes.
	pub file_size: u64,
	/// MIME type.
	pub mime_type: String,
	/// Download URL.
	pub url: String,
}

/// Payload for posting a message to a channel.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessage {
	/// Message body.
	pub content: String,
}
impl SendMessage {
	/// Builds a payload from the provided body.
	pub fn new(content: impl Into<String>) -> Self {
		Self { content: content.into() }
	}
}

/// Query parameters for the channel message listing; unset fields are omitted.
#[derive(Clone, Debug, Default)]
pub struct MessageListParams {
	/// 1-based page number.
	pub page: Option<u32>,
	/// Page size.
	pub limit: Option<u32>,
	/// Cursor: only return messages older than this message id.
	pub before: Option<String>,
}
impl MessageListParams {
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

	/// Sets the `before` cursor.
	pub fn with_before(mut self, message_id: impl Into<String>) -> Self {
		self.before = Some(message_id.into());

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
		if let Some(before) = &self.before {
			pairs.push(("before", before.clone()));
		}
		if !pairs.is_empty() {
			url.query_pairs_mut().extend_pairs(pairs);
		}
	}
}

impl Session {
	/// Lists the channels visible to the current account.
	pub async fn channels(&self) -> Result<Vec<Channel>> {
		let url = self.endpoint(&["channels"])?;

		self.call(RequestPlan::new("channels", Method::GET, url)).await
	}

	/// Lists messages in a channel, newest page first.
	pub async fn messages(
		&self,
		channel_id: &str,
		params: &MessageListParams,
	) -> Result<Paginated<Message>> {
		let mut url = self.endpoint(&["channels", channel_id, "messages"])?;

		params.append_query(&mut url);

		self.call(RequestPlan::new("messages", Method::GET, url)).await
	}

	/// Posts a message to a channel and returns the stored message.
	pub async fn send_message(&self, channel_id: &str, message: &SendMessage) -> Result<Message> {
		let url = self.endpoint(&["channels", channel_id, "messages"])?;

		self.call(RequestPlan::json("send_message", Method::POST, url, message)?).await
	}
}
