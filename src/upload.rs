//! The orchestrator: resolved document → file in the Drive folder.
//!
//! ## Stages
//!
//! ```text
//! Idle ─▶ Authenticating ─▶ FetchingContent ─▶ ResolvingFolder ─▶ Uploading ─▶ Done
//!              │                  │                  │                │
//!              └──────────────────┴──────────────────┴────────────────┴─▶ Failed
//! ```
//!
//! Each stage awaits one external response. There are no retries: the first
//! failure ends the invocation and is returned with its original cause. A
//! folder created in `ResolvingFolder` stays on Drive if `Uploading` fails.

use crate::auth::TokenProvider;
use crate::config::UploadConfig;
use crate::error::Arxiv2DriveError;
use crate::output::{
    DriveFolder, ResolvedDocument, UploadResult, UploadStage, UploadStatus, UploadTarget,
};
use crate::pipeline::drive::{DriveApi, ROOT_FOLDER};
use crate::pipeline::fetch::PaperSource;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Uploads resolved documents to Drive.
#[derive(Clone)]
pub struct Orchestrator {
    tokens: Arc<dyn TokenProvider>,
    source: Arc<dyn PaperSource>,
    drive: Arc<dyn DriveApi>,
    config: UploadConfig,
}

impl Orchestrator {
    pub fn new(
        tokens: Arc<dyn TokenProvider>,
        source: Arc<dyn PaperSource>,
        drive: Arc<dyn DriveApi>,
        config: UploadConfig,
    ) -> Self {
        Self {
            tokens,
            source,
            drive,
            config,
        }
    }

    /// Run one upload, single attempt.
    ///
    /// # Errors
    /// - [`Arxiv2DriveError::AuthenticationFailed`] — nothing was fetched or touched on Drive
    /// - [`Arxiv2DriveError::NetworkFailure`] / [`Arxiv2DriveError::NotAPdf`] — PDF fetch or
    ///   folder lookup failed
    /// - [`Arxiv2DriveError::UploadFailed`] — Drive rejected the file
    pub async fn upload(
        &self,
        document: &ResolvedDocument,
    ) -> Result<UploadResult, Arxiv2DriveError> {
        let start = Instant::now();
        info!("Uploading '{}' from {}", document.filename, document.pdf_url);
        self.enter(UploadStage::Idle);

        // ── Step 1: Authenticate ─────────────────────────────────────────
        let token = self
            .stage(UploadStage::Authenticating, self.tokens.access_token())
            .await?;
        debug!("Access token acquired");

        // ── Step 2: Fetch content ────────────────────────────────────────
        let content = self
            .stage(
                UploadStage::FetchingContent,
                self.source.fetch_content(&document.pdf_url),
            )
            .await?;
        let size_bytes = content.bytes.len();

        // ── Step 3: Ensure folder ────────────────────────────────────────
        let folder = self
            .stage(UploadStage::ResolvingFolder, self.ensure_folder(&token))
            .await?;

        // ── Step 4: Upload ───────────────────────────────────────────────
        let target = UploadTarget {
            content,
            filename: document.filename.clone(),
            parent_folder_id: folder.id.clone(),
            access_token: token,
        };
        let remote_file = self
            .stage(UploadStage::Uploading, self.drive.upload_file(&target))
            .await?;
        drop(target);

        // ── Step 5: Report ───────────────────────────────────────────────
        let result = UploadResult {
            status: UploadStatus::Ok,
            remote_file_id: remote_file.id.clone(),
            remote_file,
            folder,
            file: document.clone(),
            size_bytes,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "Uploaded '{}' as {} in {}ms",
            result.file.filename, result.remote_file_id, result.duration_ms
        );

        self.enter(UploadStage::Done);
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_complete(&result);
        }
        Ok(result)
    }

    /// Look up the configured folder; create it under the Drive root if absent.
    ///
    /// When several folders share the name, the first one Drive lists wins.
    pub async fn ensure_folder(&self, token: &str) -> Result<DriveFolder, Arxiv2DriveError> {
        let name = &self.config.folder_name;
        let found = self.drive.find_folders(token, name).await?;
        debug!("Folder search for '{}' returned {} match(es)", name, found.len());

        if let Some(folder) = found.into_iter().next() {
            info!("Using existing folder '{}' ({})", name, folder.id);
            return Ok(folder);
        }

        info!("Folder '{}' not found, creating it", name);
        self.drive.create_folder(token, name, ROOT_FOLDER).await
    }

    fn enter(&self, stage: UploadStage) {
        debug!("Upload stage: {}", stage);
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_stage(stage);
        }
    }

    /// Enter `stage`, await `fut`, and report a failure against `stage`.
    async fn stage<T>(
        &self,
        stage: UploadStage,
        fut: impl Future<Output = Result<T, Arxiv2DriveError>>,
    ) -> Result<T, Arxiv2DriveError> {
        self.enter(stage);
        fut.await.inspect_err(|e| {
            warn!("Upload failed while {}: {}", stage, e);
            if let Some(ref cb) = self.config.progress_callback {
                cb.on_failed(stage, &e.to_string());
                cb.on_stage(UploadStage::Failed);
            }
        })
    }
}
