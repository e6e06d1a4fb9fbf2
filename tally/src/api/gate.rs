use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Admits one extraction at a time.
///
/// The permit returned by [`ExtractionGate::try_enter`] re-opens the gate
/// when dropped, whichever way the extraction ends.
#[derive(Clone)]
pub struct ExtractionGate {
    permits: Arc<Semaphore>,
}

impl ExtractionGate {
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    pub fn try_enter(&self) -> Option<OwnedSemaphorePermit> {
        Arc::clone(&self.permits).try_acquire_owned().ok()
    }

    pub fn is_busy(&self) -> bool {
        self.permits.available_permits() == 0
    }
}

impl Default for ExtractionGate {
    fn default() -> Self {
        Self::new()
    }
}
