//! Data model shared by the resolver, the orchestrator and the CLI.
//!
//! Nothing here outlives a single invocation: a [`PageReference`] comes in,
//! a [`ResolvedDocument`] is derived from it, an [`UploadTarget`] is
//! assembled and dropped after the Drive call, and an [`UploadResult`] goes
//! back to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The page the user triggered the command on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageReference {
    /// Address of the page.
    pub url: String,
    /// Opaque handle of the page in its host (tab id, invocation id, ...).
    pub id: String,
    /// Title the host displays for the page, if known.
    pub title: Option<String>,
}

impl PageReference {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            id: String::new(),
            title: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// An arXiv paper identifier, e.g. `2301.01234v2` or `cs.LG/0501001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaperId(String);

impl PaperId {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a PDF lives and what it should be called on Drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDocument {
    pub paper_id: PaperId,
    pub pdf_url: String,
    pub abs_url: String,
    pub filename: String,
}

/// Outcome of resolving a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedDocument),
    /// The page is not an arXiv abstract or PDF page.
    NotApplicable,
}

impl Resolution {
    /// Treat [`Resolution::NotApplicable`] as an error.
    pub fn into_result(
        self,
        url: &str,
    ) -> Result<ResolvedDocument, crate::error::Arxiv2DriveError> {
        match self {
            Resolution::Resolved(doc) => Ok(doc),
            Resolution::NotApplicable => Err(crate::error::Arxiv2DriveError::UnsupportedPage {
                url: url.to_string(),
            }),
        }
    }
}

/// Binary content fetched from arXiv.
#[derive(Clone, PartialEq, Eq)]
pub struct FetchedContent {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl fmt::Debug for FetchedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchedContent")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Everything the Drive upload call needs, assembled right before it.
#[derive(Clone)]
pub struct UploadTarget {
    pub content: FetchedContent,
    pub filename: String,
    pub parent_folder_id: String,
    pub access_token: String,
}

impl fmt::Debug for UploadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadTarget")
            .field("content", &self.content)
            .field("filename", &self.filename)
            .field("parent_folder_id", &self.parent_folder_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// A Drive folder, looked up or created per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveFolder {
    pub id: String,
    /// `true` when this invocation created the folder.
    #[serde(default)]
    pub created: bool,
}

/// File metadata as returned by the Drive v3 API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Status tag of a completed upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Ok,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub status: UploadStatus,
    pub remote_file_id: String,
    pub remote_file: DriveFile,
    pub folder: DriveFolder,
    /// The document that was uploaded.
    pub file: ResolvedDocument,
    pub size_bytes: usize,
    pub duration_ms: u64,
}

/// Stages of one upload, in order. Any stage may jump to `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStage {
    Idle,
    Authenticating,
    FetchingContent,
    ResolvingFolder,
    Uploading,
    Done,
    Failed,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UploadStage::Idle => "idle",
            UploadStage::Authenticating => "authenticating",
            UploadStage::FetchingContent => "fetching PDF",
            UploadStage::ResolvingFolder => "resolving folder",
            UploadStage::Uploading => "uploading",
            UploadStage::Done => "done",
            UploadStage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// What a command invocation ended with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// The page was not an arXiv page; nothing was fetched or uploaded.
    NotApplicable { url: String },
    Uploaded(UploadResult),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_target_debug_redacts_token() {
        let t = UploadTarget {
            content: FetchedContent {
                bytes: vec![0; 10],
                mime_type: "application/pdf".into(),
            },
            filename: "a.pdf".into(),
            parent_folder_id: "f1".into(),
            access_token: "ya29.secret".into(),
        };
        let dbg = format!("{t:?}");
        assert!(!dbg.contains("ya29"));
        assert!(dbg.contains("<10 bytes>"));
    }

    #[test]
    fn drive_file_parses_v3_response() {
        let json = r#"{"kind":"drive#file","id":"abc","name":"Example Paper.pdf","mimeType":"application/pdf"}"#;
        let f: DriveFile = serde_json::from_str(json).unwrap();
        assert_eq!(f.id, "abc");
        assert_eq!(f.mime_type, "application/pdf");
        assert_eq!(f.kind.as_deref(), Some("drive#file"));
    }

    #[test]
    fn not_applicable_into_result_is_unsupported_page() {
        let err = Resolution::NotApplicable
            .into_result("https://example.com")
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::UnsupportedPage);
    }

    #[test]
    fn outcome_serialises_with_tag() {
        let o = CommandOutcome::NotApplicable {
            url: "https://example.com".into(),
        };
        let json = serde_json::to_value(&o).unwrap();
        assert_eq!(json["outcome"], "not_applicable");
    }
}
