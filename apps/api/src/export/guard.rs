//! One export per document at a time.
//!
//! A second export of a document that is still exporting is refused rather
//! than queued. The permit releases its slot when dropped, on every exit path.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

#[derive(Clone, Default)]
pub struct ExportGuard {
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl ExportGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` when `document_id` already has an export in flight.
    pub fn try_acquire(&self, document_id: Uuid) -> Option<ExportPermit> {
        if lock(&self.in_flight).insert(document_id) {
            Some(ExportPermit {
                document_id,
                in_flight: Arc::clone(&self.in_flight),
            })
        } else {
            None
        }
    }
}

/// Held for the duration of one export.
pub struct ExportPermit {
    document_id: Uuid,
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
}

impl Drop for ExportPermit {
    fn drop(&mut self) {
        lock(&self.in_flight).remove(&self.document_id);
    }
}

// The set holds plain ids, so a poisoned lock still holds consistent data.
fn lock(set: &Mutex<HashSet<Uuid>>) -> MutexGuard<'_, HashSet<Uuid>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
