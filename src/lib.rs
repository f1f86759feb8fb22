//! # arxiv2drive
//!
//! Save the arXiv paper you are looking at into a Google Drive folder.
//!
//! Given the URL of an arXiv abstract page (`/abs/<id>`) or PDF page
//! (`/pdf/<id>`), the crate derives the direct PDF URL, names the file after
//! the paper title scraped from the abstract page, and uploads the PDF into a
//! flat `arXiv` folder on the user's Drive through the Drive v3 REST API.
//!
//! ## Flow Overview
//!
//! ```text
//! trigger (page URL)
//!  │
//!  ├─ 1. Resolve   classify URL, fetch abstract page, scrape <title>
//!  ├─ 2. Auth      bearer token from a TokenProvider
//!  ├─ 3. Fetch     PDF bytes from arXiv
//!  ├─ 4. Folder    find "arXiv" folder, create under root if missing
//!  └─ 5. Upload    multipart/related POST to the Drive upload endpoint
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arxiv2drive::{save_to_drive, CommandTokenProvider, PageReference, UploadConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Token from `gcloud auth print-access-token`
//!     let tokens = Arc::new(CommandTokenProvider::default());
//!     let page = PageReference::new("https://arxiv.org/abs/1706.03762");
//!     let outcome = save_to_drive(&page, &UploadConfig::default(), tokens).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `arxiv2drive` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod auth;
pub mod command;
pub mod config;
pub mod error;
pub mod gate;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod resolve;
pub mod upload;

#[cfg(test)]
mod testing;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use auth::{CommandTokenProvider, StaticTokenProvider, TokenProvider};
pub use command::{save_to_drive, CommandHandler};
pub use config::{FilenameStyle, TitleFallback, UploadConfig, UploadConfigBuilder};
pub use error::{Arxiv2DriveError, ErrorKind, TitleError};
pub use gate::InvocationGate;
pub use output::{
    CommandOutcome, DriveFile, DriveFolder, PageReference, PaperId, Resolution, ResolvedDocument,
    UploadResult, UploadStage, UploadStatus,
};
pub use progress::{NoopProgressCallback, ProgressCallback, UploadProgressCallback};
pub use resolve::{resolve_url, Resolver};
pub use upload::Orchestrator;
