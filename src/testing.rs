//! In-memory stand-ins for arXiv, Drive and the token provider, shared by
//! the unit tests of the resolver, orchestrator and command handler.

use crate::auth::TokenProvider;
use crate::error::Arxiv2DriveError;
use crate::output::{DriveFile, DriveFolder, FetchedContent, UploadResult, UploadStage, UploadTarget};
use crate::pipeline::drive::DriveApi;
use crate::pipeline::fetch::PaperSource;
use crate::progress::UploadProgressCallback;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const PDF_BYTES: &[u8] = b"%PDF-1.5\n% fake paper\n%%EOF";

#[derive(Default)]
pub struct FakeSource {
    pages: HashMap<String, String>,
    pdfs: HashMap<String, Vec<u8>>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn pdf(mut self, url: &str, bytes: &[u8]) -> Self {
        self.pdfs.insert(url.to_string(), bytes.to_vec());
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl PaperSource for FakeSource {
    async fn fetch_text(&self, url: &str) -> Result<String, Arxiv2DriveError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Arxiv2DriveError::network(url, "HTTP 404 Not Found"))
    }

    async fn fetch_content(&self, url: &str) -> Result<FetchedContent, Arxiv2DriveError> {
        self.requests.lock().unwrap().push(url.to_string());
        let bytes = self
            .pdfs
            .get(url)
            .cloned()
            .ok_or_else(|| Arxiv2DriveError::network(url, "HTTP 404 Not Found"))?;
        crate::pipeline::fetch::validate_pdf(url, bytes, Some("application/pdf"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedUpload {
    pub filename: String,
    pub parent: String,
    pub token: String,
    pub mime_type: String,
    pub size: usize,
}

#[derive(Default)]
pub struct FakeDrive {
    existing: Vec<String>,
    upload_status: Option<u16>,
    pub searches: AtomicUsize,
    pub created: Mutex<Vec<(String, String)>>,
    pub uploads: Mutex<Vec<RecordedUpload>>,
}

impl FakeDrive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folders(ids: &[&str]) -> Self {
        Self {
            existing: ids.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn failing_upload(mut self, status: u16) -> Self {
        self.upload_status = Some(status);
        self
    }

    pub fn call_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
            + self.created.lock().unwrap().len()
            + self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl DriveApi for FakeDrive {
    async fn find_folders(
        &self,
        _token: &str,
        _name: &str,
    ) -> Result<Vec<DriveFolder>, Arxiv2DriveError> {
        self.searches.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .existing
            .iter()
            .map(|id| DriveFolder {
                id: id.clone(),
                created: false,
            })
            .collect())
    }

    async fn create_folder(
        &self,
        _token: &str,
        name: &str,
        parent: &str,
    ) -> Result<DriveFolder, Arxiv2DriveError> {
        self.created
            .lock()
            .unwrap()
            .push((name.to_string(), parent.to_string()));
        Ok(DriveFolder {
            id: "new-folder".into(),
            created: true,
        })
    }

    async fn upload_file(&self, target: &UploadTarget) -> Result<DriveFile, Arxiv2DriveError> {
        self.uploads.lock().unwrap().push(RecordedUpload {
            filename: target.filename.clone(),
            parent: target.parent_folder_id.clone(),
            token: target.access_token.clone(),
            mime_type: target.content.mime_type.clone(),
            size: target.content.bytes.len(),
        });
        if let Some(status) = self.upload_status {
            return Err(Arxiv2DriveError::UploadFailed {
                status,
                body: "rejected".into(),
            });
        }
        Ok(DriveFile {
            id: "file-1".into(),
            name: target.filename.clone(),
            mime_type: target.content.mime_type.clone(),
            kind: Some("drive#file".into()),
        })
    }
}

pub struct FakeTokens {
    token: Option<String>,
    pub calls: AtomicUsize,
}

impl FakeTokens {
    pub fn granting(token: &str) -> Self {
        Self {
            token: Some(token.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn refusing() -> Self {
        Self {
            token: None,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl TokenProvider for FakeTokens {
    async fn access_token(&self) -> Result<String, Arxiv2DriveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.token
            .clone()
            .ok_or_else(|| Arxiv2DriveError::AuthenticationFailed {
                detail: "user cancelled consent".into(),
            })
    }
}

#[derive(Default)]
pub struct StageRecorder {
    pub stages: Mutex<Vec<UploadStage>>,
    pub failed: Mutex<Option<UploadStage>>,
    pub completed: AtomicUsize,
}

impl UploadProgressCallback for StageRecorder {
    fn on_stage(&self, stage: UploadStage) {
        self.stages.lock().unwrap().push(stage);
    }

    fn on_failed(&self, stage: UploadStage, _error: &str) {
        *self.failed.lock().unwrap() = Some(stage);
    }

    fn on_complete(&self, _result: &UploadResult) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

/// One canned HTTP reply served by [`StubServer`].
pub struct StubReply {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl StubReply {
    pub fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: &str) -> Self {
        Self::new(status, "application/json", body)
    }
}

/// Local HTTP/1.1 server answering one connection per reply, in order.
///
/// Every request is recorded verbatim (request line, headers, body) so tests
/// can assert what the real reqwest clients put on the wire.
pub struct StubServer {
    pub base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub async fn start(replies: Vec<StubReply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        tokio::spawn(async move {
            for reply in replies {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut socket).await;
                log.lock().unwrap().push(request);

                let head = format!(
                    "HTTP/1.1 {} Stub\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
                    reply.status,
                    reply.content_type,
                    reply.body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&reply.body).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { base, requests }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// A client that ignores proxy settings from the environment.
    pub fn client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
        let length = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= end + 4 + length {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}
