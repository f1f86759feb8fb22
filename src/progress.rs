//! Progress-callback trait for upload stage events.
//!
//! Inject an [`Arc<dyn UploadProgressCallback>`] via
//! [`crate::config::UploadConfigBuilder::progress_callback`] to observe the
//! orchestrator as it walks `Authenticating → FetchingContent →
//! ResolvingFolder → Uploading → Done`.
//!
//! # Example
//!
//! ```rust
//! use arxiv2drive::{UploadConfig, UploadProgressCallback, UploadStage};
//! use std::sync::Arc;
//!
//! struct PrintStages;
//!
//! impl UploadProgressCallback for PrintStages {
//!     fn on_stage(&self, stage: UploadStage) {
//!         eprintln!("→ {stage}");
//!     }
//! }
//!
//! let config = UploadConfig::builder()
//!     .progress_callback(Arc::new(PrintStages))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{UploadResult, UploadStage};
use std::sync::Arc;

/// Called by the orchestrator as an upload moves between stages.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait UploadProgressCallback: Send + Sync {
    /// Called when the orchestrator enters `stage`.
    fn on_stage(&self, stage: UploadStage) {
        let _ = stage;
    }

    /// Called once when `stage` fails; no further events follow.
    ///
    /// # Arguments
    /// * `stage` — the stage that was running
    /// * `error` — human-readable error description
    fn on_failed(&self, stage: UploadStage, error: &str) {
        let _ = (stage, error);
    }

    /// Called once after Drive accepted the file.
    fn on_complete(&self, result: &UploadResult) {
        let _ = result;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl UploadProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::UploadConfig`].
pub type ProgressCallback = Arc<dyn UploadProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        stages: Mutex<Vec<UploadStage>>,
        failures: Mutex<Vec<(UploadStage, String)>>,
    }

    impl UploadProgressCallback for Recorder {
        fn on_stage(&self, stage: UploadStage) {
            self.stages.lock().unwrap().push(stage);
        }

        fn on_failed(&self, stage: UploadStage, error: &str) {
            self.failures.lock().unwrap().push((stage, error.to_string()));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_stage(UploadStage::Authenticating);
        cb.on_failed(UploadStage::Uploading, "boom");
    }

    #[test]
    fn recorder_receives_events() {
        let rec = Recorder::default();
        rec.on_stage(UploadStage::Authenticating);
        rec.on_stage(UploadStage::FetchingContent);
        rec.on_failed(UploadStage::FetchingContent, "HTTP 404");

        assert_eq!(
            *rec.stages.lock().unwrap(),
            vec![UploadStage::Authenticating, UploadStage::FetchingContent]
        );
        assert_eq!(rec.failures.lock().unwrap()[0].1, "HTTP 404");
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_stage(UploadStage::Done);
    }
}
