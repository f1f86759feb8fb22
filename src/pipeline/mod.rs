//! Building blocks shared by the resolver and the orchestrator.
//!
//! ## Data Flow
//!
//! ```text
//! classify ──▶ fetch (abs HTML) ──▶ title ──▶ fetch (PDF) ──▶ drive
//! (URL kind)   (arXiv)              (name)    (arXiv)         (folder + upload)
//! ```
//!
//! 1. [`classify`] — decide abstract page / PDF page / not applicable; pure
//! 2. [`title`]    — scrape the first `<title>` and build the Drive filename; pure
//! 3. [`fetch`]    — GET abstract HTML and PDF bytes from arXiv
//! 4. [`drive`]    — Drive v3 folder search, folder creation, multipart upload

pub mod classify;
pub mod drive;
pub mod fetch;
pub mod title;
