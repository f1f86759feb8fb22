//! The resolver: page URL → direct PDF URL + Drive filename.
//!
//! ```text
//! page URL ──▶ classify ──▶ abstract page HTML ──▶ <title> ──▶ filename
//!                 │                                   │
//!                 └─ NotApplicable (no I/O)           └─ TitleFallback on failure
//! ```
//!
//! Abstract pages yield `<base>/pdf/<id>.pdf`; PDF pages keep their own URL
//! and the title is read from `<base>/abs/<id>`. Pages that are neither
//! short-circuit before any network call.

use crate::config::{TitleFallback, UploadConfig};
use crate::error::{Arxiv2DriveError, TitleError};
use crate::output::{PageReference, Resolution, ResolvedDocument};
use crate::pipeline::classify::{abs_url, classify, pdf_url, PageKind};
use crate::pipeline::fetch::PaperSource;
use crate::pipeline::title::{build_filename, clean_title, extract_title};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Derives [`ResolvedDocument`]s from pages.
#[derive(Clone)]
pub struct Resolver {
    source: Arc<dyn PaperSource>,
    config: UploadConfig,
}

impl Resolver {
    pub fn new(source: Arc<dyn PaperSource>, config: UploadConfig) -> Self {
        Self { source, config }
    }

    /// Resolve `page` into a PDF URL and filename.
    ///
    /// # Returns
    /// - `Ok(Resolution::NotApplicable)` — not an arXiv abstract/PDF page
    /// - `Ok(Resolution::Resolved(_))` — ready to upload
    ///
    /// # Errors
    /// [`Arxiv2DriveError::TitleUnavailable`] when the title cannot be read
    /// and [`TitleFallback`] does not allow falling back to `page.title`.
    pub async fn resolve(&self, page: &PageReference) -> Result<Resolution, Arxiv2DriveError> {
        let base = self.config.arxiv_base_url()?;

        let Some(kind) = classify(&page.url, &base) else {
            info!("Not an arXiv abstract or PDF page: {}", page.url);
            return Ok(Resolution::NotApplicable);
        };
        debug!("Classified {} as {:?}", page.url, kind);

        let (paper_id, pdf, abs) = match kind {
            PageKind::Abstract(id) => {
                let pdf = pdf_url(&base, &id);
                let abs = abs_url(&base, &id);
                (id, pdf, abs)
            }
            PageKind::Pdf(id) => {
                let abs = abs_url(&base, &id);
                (id, page.url.trim().to_string(), abs)
            }
        };

        let title = match self.fetch_title(&abs).await {
            Ok(title) => title,
            Err(reason) => self.fallback_title(page, &abs, reason)?,
        };
        let filename = build_filename(&title, &paper_id, self.config.filename_style);

        info!("Resolved {} → {} as '{}'", page.url, pdf, filename);
        Ok(Resolution::Resolved(ResolvedDocument {
            paper_id,
            pdf_url: pdf,
            abs_url: abs,
            filename,
        }))
    }

    async fn fetch_title(&self, abs: &str) -> Result<String, TitleError> {
        let html = self
            .source
            .fetch_text(abs)
            .await
            .map_err(|e| TitleError::Fetch {
                detail: e.to_string(),
            })?;
        extract_title(&html)
    }

    fn fallback_title(
        &self,
        page: &PageReference,
        abs: &str,
        reason: TitleError,
    ) -> Result<String, Arxiv2DriveError> {
        warn!("Title not found for {}: {}", abs, reason);

        let displayed = page
            .title
            .as_deref()
            .map(clean_title)
            .filter(|t| !t.is_empty());

        match (self.config.title_fallback, displayed) {
            (TitleFallback::TabTitle, Some(title)) => {
                info!("Falling back to the displayed title '{}'", title);
                Ok(title)
            }
            _ => Err(Arxiv2DriveError::TitleUnavailable {
                url: abs.to_string(),
                reason,
            }),
        }
    }
}

/// Resolve a bare URL with an HTTP source built from `config`.
pub async fn resolve_url(
    url: &str,
    config: &UploadConfig,
) -> Result<Resolution, Arxiv2DriveError> {
    let source = crate::pipeline::fetch::HttpSource::from_config(config)?;
    Resolver::new(Arc::new(source), config.clone())
        .resolve(&PageReference::new(url))
        .await
}
