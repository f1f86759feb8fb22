//! Configuration types for saving arXiv papers to Google Drive.
//!
//! Every endpoint and policy lives in [`UploadConfig`], built via its
//! [`UploadConfigBuilder`]. The resolver, the orchestrator and the HTTP
//! clients are all constructed from one config value, so pointing the whole
//! flow at a mirror or a test server is a matter of changing three URLs.

use crate::error::Arxiv2DriveError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default arXiv origin.
pub const DEFAULT_ARXIV_BASE: &str = "https://arxiv.org";
/// Drive v3 metadata endpoint (folder search and creation).
pub const DEFAULT_DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v3/files";
/// Drive v3 media upload endpoint.
pub const DEFAULT_DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
/// Drive folder that receives every paper.
pub const DEFAULT_FOLDER_NAME: &str = "arXiv";

/// Configuration for one resolve-and-upload flow.
///
/// # Example
/// ```rust
/// use arxiv2drive::{TitleFallback, UploadConfig};
///
/// let config = UploadConfig::builder()
///     .folder_name("papers")
///     .title_fallback(TitleFallback::TabTitle)
///     .build()
///     .unwrap();
/// assert_eq!(config.folder_name, "papers");
/// ```
#[derive(Clone)]
pub struct UploadConfig {
    /// arXiv origin used to classify pages and build abstract/PDF URLs.
    /// Default: `https://arxiv.org`.
    pub arxiv_base: String,

    /// Drive `files` endpoint for folder search and creation.
    pub drive_api_url: String,

    /// Drive upload endpoint; `uploadType=multipart` is appended per request.
    pub drive_upload_url: String,

    /// Name of the flat Drive folder papers are saved into. Default: `arXiv`.
    pub folder_name: String,

    /// How the Drive filename is derived from the title. Default: [`FilenameStyle::Title`].
    pub filename_style: FilenameStyle,

    /// What to do when the abstract page yields no title. Default: [`TitleFallback::Abort`].
    pub title_fallback: TitleFallback,

    /// Per-request timeout in seconds. `None` leaves timeouts to the network stack.
    pub request_timeout_secs: Option<u64>,

    /// `User-Agent` header sent to arXiv and Drive.
    pub user_agent: String,

    /// Optional stage-by-stage progress observer.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            arxiv_base: DEFAULT_ARXIV_BASE.to_string(),
            drive_api_url: DEFAULT_DRIVE_API_URL.to_string(),
            drive_upload_url: DEFAULT_DRIVE_UPLOAD_URL.to_string(),
            folder_name: DEFAULT_FOLDER_NAME.to_string(),
            filename_style: FilenameStyle::default(),
            title_fallback: TitleFallback::default(),
            request_timeout_secs: None,
            user_agent: concat!("arxiv2drive/", env!("CARGO_PKG_VERSION")).to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for UploadConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadConfig")
            .field("arxiv_base", &self.arxiv_base)
            .field("drive_api_url", &self.drive_api_url)
            .field("drive_upload_url", &self.drive_upload_url)
            .field("folder_name", &self.folder_name)
            .field("filename_style", &self.filename_style)
            .field("title_fallback", &self.title_fallback)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn UploadProgressCallback>"),
            )
            .finish()
    }
}

impl UploadConfig {
    /// Create a new builder for `UploadConfig`.
    pub fn builder() -> UploadConfigBuilder {
        UploadConfigBuilder {
            config: Self::default(),
        }
    }

    /// Parsed arXiv origin. Always valid for a config produced by `build()`.
    pub(crate) fn arxiv_base_url(&self) -> Result<reqwest::Url, Arxiv2DriveError> {
        reqwest::Url::parse(&self.arxiv_base).map_err(|e| {
            Arxiv2DriveError::InvalidConfig(format!("arxiv_base '{}': {e}", self.arxiv_base))
        })
    }

    /// Build the shared HTTP client for arXiv and Drive calls.
    pub(crate) fn http_client(&self) -> Result<reqwest::Client, Arxiv2DriveError> {
        let mut builder = reqwest::Client::builder().user_agent(self.user_agent.clone());
        if let Some(secs) = self.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder
            .build()
            .map_err(|e| Arxiv2DriveError::Internal(format!("HTTP client: {e}")))
    }
}

/// Builder for [`UploadConfig`].
#[derive(Debug)]
pub struct UploadConfigBuilder {
    config: UploadConfig,
}

impl UploadConfigBuilder {
    pub fn arxiv_base(mut self, url: impl Into<String>) -> Self {
        self.config.arxiv_base = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn drive_api_url(mut self, url: impl Into<String>) -> Self {
        self.config.drive_api_url = url.into();
        self
    }

    pub fn drive_upload_url(mut self, url: impl Into<String>) -> Self {
        self.config.drive_upload_url = url.into();
        self
    }

    pub fn folder_name(mut self, name: impl Into<String>) -> Self {
        self.config.folder_name = name.into();
        self
    }

    pub fn filename_style(mut self, style: FilenameStyle) -> Self {
        self.config.filename_style = style;
        self
    }

    pub fn title_fallback(mut self, fallback: TitleFallback) -> Self {
        self.config.title_fallback = fallback;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs.max(1));
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<UploadConfig, Arxiv2DriveError> {
        let c = &self.config;
        for (field, value) in [
            ("arxiv_base", &c.arxiv_base),
            ("drive_api_url", &c.drive_api_url),
            ("drive_upload_url", &c.drive_upload_url),
        ] {
            let url = reqwest::Url::parse(value).map_err(|e| {
                Arxiv2DriveError::InvalidConfig(format!("{field} '{value}' is not a URL: {e}"))
            })?;
            if url.host_str().is_none() {
                return Err(Arxiv2DriveError::InvalidConfig(format!(
                    "{field} '{value}' has no host"
                )));
            }
        }
        if c.folder_name.trim().is_empty() {
            return Err(Arxiv2DriveError::InvalidConfig(
                "Folder name must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// How the Drive filename is built from the scraped title.
///
/// arXiv abstract pages already title themselves `[<id>] <title>`, so
/// [`FilenameStyle::Title`] keeps whatever the page says. `IdPrefixed`
/// guarantees the identifier is present even for mirrors that omit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilenameStyle {
    /// `<title>.pdf` (default)
    #[default]
    Title,
    /// `<id> <title>.pdf`, unless the title already contains the id.
    IdPrefixed,
}

/// Policy when the abstract page yields no usable title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitleFallback {
    /// Fail the invocation with `TitleUnavailable`. (default)
    #[default]
    Abort,
    /// Use the displayed tab title; abort only when none was supplied.
    TabTitle,
}
