//! In-process preview handles for uploaded images.
//!
//! A preview is a locally-scoped, revocable reference that lets the UI
//! display an uploaded image without re-reading the original file — the
//! server-side analogue of an object URL. Entries are owned by the state
//! that registered them and released exactly once: revocation is map
//! removal, so a second release of the same id is a no-op.

use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

pub type PreviewId = Uuid;

/// One stored preview image.
#[derive(Debug, Clone)]
pub struct Preview {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Registry of live previews.
#[derive(Default)]
pub struct PreviewStore {
    entries: RwLock<HashMap<PreviewId, Preview>>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register image bytes and return the handle to display them.
    pub fn register(&self, mime_type: &str, bytes: Vec<u8>) -> PreviewId {
        let id = Uuid::new_v4();
        let preview = Preview {
            mime_type: mime_type.to_string(),
            bytes,
        };
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, preview);
        id
    }

    /// Fetch a live preview; `None` once revoked.
    pub fn get(&self, id: PreviewId) -> Option<Preview> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }

    /// Release one preview. Idempotent.
    pub fn revoke(&self, id: PreviewId) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id);
    }

    /// Release every held preview.
    pub fn revoke_all(&self) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
