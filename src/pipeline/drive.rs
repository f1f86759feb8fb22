//! Google Drive v3 REST calls: folder search, folder creation and multipart
//! upload.
//!
//! [`DriveApi`] is the seam the orchestrator talks to. [`DriveClient`] is a
//! stateless reqwest implementation configured with endpoint values at
//! construction; every call carries the bearer token it is given.

use crate::config::UploadConfig;
use crate::error::Arxiv2DriveError;
use crate::output::{DriveFile, DriveFolder, UploadTarget};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, info};

/// MIME type Drive uses for folders.
pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Parent id Drive uses for "My Drive".
pub const ROOT_FOLDER: &str = "root";

/// The Drive operations the orchestrator needs.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// Folders named `name`, in the order Drive lists them.
    async fn find_folders(&self, token: &str, name: &str)
        -> Result<Vec<DriveFolder>, Arxiv2DriveError>;

    /// Create a folder named `name` under `parent`.
    async fn create_folder(
        &self,
        token: &str,
        name: &str,
        parent: &str,
    ) -> Result<DriveFolder, Arxiv2DriveError>;

    /// Upload `target` as a new file in its parent folder.
    async fn upload_file(&self, target: &UploadTarget) -> Result<DriveFile, Arxiv2DriveError>;
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<FileId>,
}

#[derive(Debug, Deserialize)]
struct FileId {
    id: String,
}

/// [`DriveApi`] over HTTPS.
#[derive(Debug, Clone)]
pub struct DriveClient {
    client: reqwest::Client,
    api_url: String,
    upload_url: String,
}

impl DriveClient {
    pub fn new(
        client: reqwest::Client,
        api_url: impl Into<String>,
        upload_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            upload_url: upload_url.into(),
        }
    }

    pub fn from_config(config: &UploadConfig) -> Result<Self, Arxiv2DriveError> {
        Ok(Self::new(
            config.http_client()?,
            config.drive_api_url.clone(),
            config.drive_upload_url.clone(),
        ))
    }

    /// Send `request`, map transport errors and non-2xx statuses, decode JSON.
    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, Arxiv2DriveError> {
        let response = request
            .send()
            .await
            .map_err(|e| Arxiv2DriveError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Arxiv2DriveError::network(
                url,
                format!("HTTP {status}: {}", body.trim()),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Arxiv2DriveError::InvalidResponse {
                url: url.to_string(),
                detail: e.to_string(),
            })
    }
}

#[async_trait]
impl DriveApi for DriveClient {
    async fn find_folders(
        &self,
        token: &str,
        name: &str,
    ) -> Result<Vec<DriveFolder>, Arxiv2DriveError> {
        let query = folder_query(name);
        debug!("Folder search: {}", query);

        let request = self
            .client
            .get(&self.api_url)
            .bearer_auth(token)
            .query(&[("q", query.as_str()), ("fields", "files(id)")]);

        let list: FileList = self.send_json(&self.api_url, request).await?;
        Ok(list
            .files
            .into_iter()
            .map(|f| DriveFolder {
                id: f.id,
                created: false,
            })
            .collect())
    }

    async fn create_folder(
        &self,
        token: &str,
        name: &str,
        parent: &str,
    ) -> Result<DriveFolder, Arxiv2DriveError> {
        let metadata = serde_json::json!({
            "name": name,
            "mimeType": FOLDER_MIME,
            "parents": [parent],
        });

        let request = self
            .client
            .post(&self.api_url)
            .bearer_auth(token)
            .json(&metadata);

        let created: FileId = self.send_json(&self.api_url, request).await?;
        info!("Created folder '{}' ({})", name, created.id);
        Ok(DriveFolder {
            id: created.id,
            created: true,
        })
    }

    async fn upload_file(&self, target: &UploadTarget) -> Result<DriveFile, Arxiv2DriveError> {
        let metadata = serde_json::json!({
            "name": target.filename,
            "parents": [target.parent_folder_id],
        });
        let (boundary, body) =
            multipart_related(&metadata, &target.content.bytes, &target.content.mime_type);

        let response = self
            .client
            .post(&self.upload_url)
            .query(&[("uploadType", "multipart")])
            .bearer_auth(&target.access_token)
            .header(
                CONTENT_TYPE,
                format!("multipart/related; boundary={boundary}"),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| Arxiv2DriveError::network(&self.upload_url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Arxiv2DriveError::UploadFailed {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        response
            .json::<DriveFile>()
            .await
            .map_err(|e| Arxiv2DriveError::InvalidResponse {
                url: self.upload_url.clone(),
                detail: e.to_string(),
            })
    }
}

/// Drive search expression for folders named `name`.
pub fn folder_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!("name='{escaped}' and mimeType='{FOLDER_MIME}' and trashed=false")
}

/// Build a `multipart/related` body: JSON metadata first, then the content.
///
/// Returns the boundary alongside the body. The boundary is extended until
/// it does not occur anywhere in the content.
pub fn multipart_related(
    metadata: &serde_json::Value,
    content: &[u8],
    mime_type: &str,
) -> (String, Vec<u8>) {
    let mut boundary = String::from("arxiv2drive_boundary");
    let mut n = 0u32;
    while contains(content, boundary.as_bytes()) {
        n += 1;
        boundary = format!("arxiv2drive_boundary_{n}");
    }

    let mut body = Vec::with_capacity(content.len() + 512);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    body.extend_from_slice(metadata.to_string().as_bytes());
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    (boundary, body)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
