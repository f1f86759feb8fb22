//! Error types for the arxiv2drive library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Arxiv2DriveError`] — **Fatal**: the current invocation cannot proceed
//!   (token refused, arXiv or Drive answered with an error status, upload
//!   rejected). Returned as `Err(Arxiv2DriveError)` from the resolver, the
//!   orchestrator and the command handler.
//!
//! * [`TitleError`] — **Recoverable**: the paper title could not be scraped
//!   from the abstract page. The resolver either falls back to the displayed
//!   tab title or wraps it into [`Arxiv2DriveError::TitleUnavailable`],
//!   depending on [`crate::config::TitleFallback`].
//!
//! [`ErrorKind`] folds every fatal variant into the coarse failure taxonomy
//! callers present to users.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All fatal errors returned by the arxiv2drive library.
#[derive(Debug, Error)]
pub enum Arxiv2DriveError {
    // ── Resolution errors ─────────────────────────────────────────────────
    /// The page URL is neither an arXiv abstract page nor an arXiv PDF page.
    #[error("'{url}' is not an arXiv abstract or PDF page")]
    UnsupportedPage { url: String },

    /// The paper title could not be determined and no fallback was allowed.
    #[error("Title unavailable for '{url}': {reason}")]
    TitleUnavailable {
        url: String,
        #[source]
        reason: TitleError,
    },

    // ── Authentication errors ─────────────────────────────────────────────
    /// The token provider refused, failed, or returned an empty token.
    #[error("Authentication failed: {detail}")]
    AuthenticationFailed { detail: String },

    // ── Network errors ────────────────────────────────────────────────────
    /// Transport error or non-success status from arXiv or Drive.
    #[error("Request to '{url}' failed: {reason}")]
    NetworkFailure { url: String, reason: String },

    /// The downloaded payload does not look like a PDF.
    #[error("Content at '{url}' is not a PDF\nFirst bytes: {magic:?}")]
    NotAPdf { url: String, magic: Vec<u8> },

    /// A Drive response body could not be decoded.
    #[error("Unexpected response from '{url}': {detail}")]
    InvalidResponse { url: String, detail: String },

    // ── Upload errors ─────────────────────────────────────────────────────
    /// Drive rejected the multipart upload.
    #[error("Drive upload failed with HTTP {status}: {body}")]
    UploadFailed { status: u16, body: String },

    // ── Invocation errors ─────────────────────────────────────────────────
    /// Another invocation is still in flight.
    #[error("Another upload is already in progress; try again once it finishes")]
    Busy,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Arxiv2DriveError {
    /// Classify this error into the user-facing failure taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedPage { .. } => ErrorKind::UnsupportedPage,
            Self::TitleUnavailable { .. } => ErrorKind::TitleUnavailable,
            Self::AuthenticationFailed { .. } => ErrorKind::AuthenticationFailed,
            Self::NetworkFailure { .. } | Self::NotAPdf { .. } | Self::InvalidResponse { .. } => {
                ErrorKind::NetworkFailure
            }
            Self::UploadFailed { .. } => ErrorKind::UploadFailed,
            Self::Busy => ErrorKind::Busy,
            Self::InvalidConfig(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub(crate) fn network(url: &str, reason: impl ToString) -> Self {
        Self::NetworkFailure {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Coarse failure category of an [`Arxiv2DriveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedPage,
    TitleUnavailable,
    AuthenticationFailed,
    NetworkFailure,
    UploadFailed,
    Busy,
    Internal,
}

/// A recoverable failure while scraping the paper title.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum TitleError {
    /// The page had no `<title>` element, or it was empty after cleanup.
    #[error("no <title> element found")]
    Missing,

    /// The abstract page could not be fetched.
    #[error("abstract page fetch failed: {detail}")]
    Fetch { detail: String },
}
