//! Single-flight gate for command invocations.
//!
//! The folder lookup is check-then-create, so two overlapping invocations
//! could each create their own "arXiv" folder. The gate admits one
//! invocation at a time and rejects the rest with
//! [`Arxiv2DriveError::Busy`] instead of queueing them.

use crate::error::Arxiv2DriveError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Admits at most one in-flight invocation. Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct InvocationGate {
    busy: Arc<AtomicBool>,
}

impl InvocationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the gate, or fail with `Busy` if an invocation is in flight.
    pub fn try_enter(&self) -> Result<GateGuard, Arxiv2DriveError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Arxiv2DriveError::Busy)?;
        Ok(GateGuard {
            busy: Arc::clone(&self.busy),
        })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the gate when dropped.
#[derive(Debug)]
pub struct GateGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
