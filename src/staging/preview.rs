//! Transient preview handles for staged images.
//!
//! A preview handle is a revocable reference into client memory used only for
//! on-screen preview, distinct from the payload that gets submitted. Handles
//! are scoped: acquisition registers the handle, dropping it releases the
//! registration. There is no manual release method, so releasing twice or
//! reading through a released handle cannot be expressed.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Tracks live preview handles and counts acquisitions/releases.
///
/// The counters exist so tests (and debug assertions) can verify that every
/// handle acquired over a session's lifetime was released exactly once.
#[derive(Debug, Default)]
pub struct PreviewRegistry {
    next_id: AtomicU64,
    live: Mutex<HashSet<u64>>,
    acquired: AtomicU64,
    released: AtomicU64,
}

impl PreviewRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Allocate a preview handle over the given image bytes.
    pub fn acquire(self: &Arc<Self>, data: Arc<Vec<u8>>) -> PreviewHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.live.lock().unwrap().insert(id);
        self.acquired.fetch_add(1, Ordering::Relaxed);
        PreviewHandle {
            id,
            data,
            registry: Arc::clone(self),
        }
    }

    fn release(&self, id: u64) {
        let was_live = self.live.lock().unwrap().remove(&id);
        debug_assert!(was_live, "preview handle {id} released twice");
        self.released.fetch_add(1, Ordering::Relaxed);
    }

    /// Number of currently live handles.
    pub fn live_count(&self) -> usize {
        self.live.lock().unwrap().len()
    }

    /// Total handles acquired since the registry was created.
    pub fn acquired_count(&self) -> u64 {
        self.acquired.load(Ordering::Relaxed)
    }

    /// Total handles released since the registry was created.
    pub fn released_count(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }
}

/// A live preview of one staged image.
///
/// Holds shared access to the image bytes and a registration in the
/// [`PreviewRegistry`] it was acquired from. The registration is dropped
/// together with the handle.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    data: Arc<Vec<u8>>,
    registry: Arc<PreviewRegistry>,
}

impl PreviewHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Pseudo-URI a view layer can use to address this preview.
    pub fn uri(&self) -> String {
        format!("preview://{}", self.id)
    }

    /// The previewed image bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}
