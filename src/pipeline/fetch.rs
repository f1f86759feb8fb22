//! arXiv fetching: abstract-page HTML and PDF bytes.
//!
//! [`PaperSource`] is the seam the resolver and the orchestrator read arXiv
//! through. [`HttpSource`] is the reqwest implementation; tests substitute an
//! in-memory source. No authentication is involved and nothing is retried.

use crate::config::UploadConfig;
use crate::error::Arxiv2DriveError;
use crate::output::FetchedContent;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info};

/// MIME type assumed when arXiv does not send one.
pub const PDF_MIME: &str = "application/pdf";

/// Read access to arXiv pages.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// GET `url` and return the body as text.
    async fn fetch_text(&self, url: &str) -> Result<String, Arxiv2DriveError>;

    /// GET `url` and return the body as a PDF payload.
    async fn fetch_content(&self, url: &str) -> Result<FetchedContent, Arxiv2DriveError>;
}

/// [`PaperSource`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    timeout_secs: Option<u64>,
}

impl HttpSource {
    pub fn new(client: reqwest::Client, timeout_secs: Option<u64>) -> Self {
        Self {
            client,
            timeout_secs,
        }
    }

    pub fn from_config(config: &UploadConfig) -> Result<Self, Arxiv2DriveError> {
        Ok(Self::new(config.http_client()?, config.request_timeout_secs))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, Arxiv2DriveError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Arxiv2DriveError::network(
                    url,
                    format!("timed out after {}s", self.timeout_secs.unwrap_or_default()),
                )
            } else {
                Arxiv2DriveError::network(url, e)
            }
        })?;

        if !response.status().is_success() {
            return Err(Arxiv2DriveError::network(
                url,
                format!("HTTP {}", response.status()),
            ));
        }
        Ok(response)
    }
}

#[async_trait]
impl PaperSource for HttpSource {
    async fn fetch_text(&self, url: &str) -> Result<String, Arxiv2DriveError> {
        debug!("Fetching page: {}", url);
        let response = self.get(url).await?;
        response
            .text()
            .await
            .map_err(|e| Arxiv2DriveError::network(url, e))
    }

    async fn fetch_content(&self, url: &str) -> Result<FetchedContent, Arxiv2DriveError> {
        info!("Downloading PDF from: {}", url);
        let response = self.get(url).await?;

        let mime_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Arxiv2DriveError::network(url, e))?
            .to_vec();

        let content = validate_pdf(url, bytes, mime_type.as_deref())?;
        info!("Downloaded {} bytes ({})", content.bytes.len(), content.mime_type);
        Ok(content)
    }
}

/// Check the `%PDF` magic and settle the MIME type.
///
/// A `text/html` reply with a 200 status (rate-limit or captcha pages) is
/// caught here rather than uploaded to Drive as a broken PDF.
pub fn validate_pdf(
    url: &str,
    bytes: Vec<u8>,
    content_type: Option<&str>,
) -> Result<FetchedContent, Arxiv2DriveError> {
    if !bytes.starts_with(b"%PDF") {
        return Err(Arxiv2DriveError::NotAPdf {
            url: url.to_string(),
            magic: bytes.iter().take(4).copied().collect(),
        });
    }

    let mime_type = content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream")
        .unwrap_or(PDF_MIME)
        .to_string();

    Ok(FetchedContent { bytes, mime_type })
}
