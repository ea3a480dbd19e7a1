//! File upload and download bindings.

// self
use crate::{
	_prelude::*,
	session::{MultipartPayload, RequestPlan, Session},
};

/// Upload payload: buffered file bytes plus the owning project.
///
/// Bytes are buffered (rather than streamed) so the request stays replayable when a token
/// refresh forces a retry.
#[derive(Clone)]
pub struct FileUpload {
	/// File name reported to the backend.
	pub file_name: String,
	/// MIME type of the content.
	pub mime_type: String,
	/// File content.
	pub bytes: Vec<u8>,
	/// Project the file belongs to.
	pub project_id: String,
}
impl FileUpload {
	/// Builds an upload for the provided project.
	pub fn new(
		file_name: impl Into<String>,
		mime_type: impl Into<String>,
		bytes: Vec<u8>,
		project_id: impl Into<String>,
	) -> Self {
		Self {
			file_name: file_name.into(),
			mime_type: mime_type.into(),
			bytes,
			project_id: project_id.into(),
		}
	}
}
impl Debug for FileUpload {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FileUpload")
			.field("file_name", &self.file_name)
			.field("mime_type", &self.mime_type)
			.field("bytes", &self.bytes.len())
			.field("project_id", &self.project_id)
			.finish()
	}
}

/// Stored-file summary returned after an upload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
	/// File identifier.
	pub id: String,
	/// Stored file name.
	pub name: String,
	/// Size in bytes.
	pub size: u64,
	/// Download URL.
	pub url: String,
}

impl Session {
	/// Uploads a file into a project via `multipart/form-data`.
	pub async fn upload_file(&self, upload: FileUpload) -> Result<UploadResponse> {
		let url = self.endpoint(&["files", "upload"])?;
		let payload = MultipartPayload {
			file_name: upload.file_name,
			mime_type: upload.mime_type,
			bytes: upload.bytes,
			fields: vec![("projectId", upload.project_id)],
		};

		self.call(RequestPlan::multipart("upload_file", Method::POST, url, payload)).await
	}

	/// Downloads a stored file's raw bytes.
	pub async fn download_file(&self, file_id: &str) -> Result<Vec<u8>> {
		let url = self.endpoint(&["files", file_id, "download"])?;

		self.call_bytes(RequestPlan::new("download_file", Method::GET, url)).await
	}
}
