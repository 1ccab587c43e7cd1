//! Displayable resource handles
//!
//! A [`DisplayHandle`] is a revocable reference to encoded image bytes that
//! the UI can render. Handles are minted by a [`HandleRegistry`], which
//! tracks which ones are still live, and released when dropped.
//! [`ActiveDisplaySet`] owns at most one handle per [`HandleRole`].

use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// What a handle is displayed as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleRole {
    /// Grayscale rendition of the uploaded image
    Original,
    /// Result of the remote compression call
    Compressed,
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    live: HashMap<u64, HandleRole>,
}

/// Issues handles and keeps count of the ones not yet released
///
/// Cloning shares the same registry.
#[derive(Debug, Clone, Default)]
pub struct HandleRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl HandleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new live handle over `bytes`.
    pub fn create(&self, role: HandleRole, bytes: Bytes) -> DisplayHandle {
        let mut inner = self.lock();
        inner.next_id += 1;
        let id = inner.next_id;
        inner.live.insert(id, role);

        DisplayHandle {
            id,
            role,
            bytes,
            registry: self.clone(),
        }
    }

    /// Number of handles that have not been released
    pub fn live_count(&self) -> usize {
        self.lock().live.len()
    }

    pub fn live_count_for(&self, role: HandleRole) -> usize {
        self.lock().live.values().filter(|r| **r == role).count()
    }

    fn release(&self, id: u64) {
        self.lock().live.remove(&id);
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        // Registry bookkeeping stays consistent even if a holder panicked.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A live, revocable reference to displayable image bytes
///
/// Not `Clone`: exactly one owner decides when it is released.
pub struct DisplayHandle {
    id: u64,
    role: HandleRole,
    bytes: Bytes,
    registry: HandleRegistry,
}

impl DisplayHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn role(&self) -> HandleRole {
        self.role
    }

    /// Encoded image bytes (PNG or whatever the backend returned)
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Object-URL style name, handy in logs
    pub fn url(&self) -> String {
        format!("blob:svd-explorer/{}", self.id)
    }

    /// Release the handle now instead of at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        self.registry.release(self.id);
    }
}

impl fmt::Debug for DisplayHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayHandle")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// The handles currently rendered by the UI, at most one per role
#[derive(Debug, Default)]
pub struct ActiveDisplaySet {
    original: Option<DisplayHandle>,
    compressed: Option<DisplayHandle>,
}

impl ActiveDisplaySet {
    /// Make `handle` the active one for its role and release the one it replaces.
    pub fn publish(&mut self, handle: DisplayHandle) {
        let slot = match handle.role() {
            HandleRole::Original => &mut self.original,
            HandleRole::Compressed => &mut self.compressed,
        };

        if let Some(previous) = slot.replace(handle) {
            previous.release();
        }
    }

    pub fn original(&self) -> Option<&DisplayHandle> {
        self.original.as_ref()
    }

    pub fn compressed(&self) -> Option<&DisplayHandle> {
        self.compressed.as_ref()
    }

    /// Release every active handle.
    pub fn clear(&mut self) {
        self.original = None;
        self.compressed = None;
    }
}
