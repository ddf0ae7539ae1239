use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

use ragdoc_core::types::IndexStatus;

use crate::index::DocumentIndex;

/// Holder of the single active document.
///
/// The lock guards only the pointer: writers build a complete
/// `DocumentIndex` first and swap it in, readers clone the `Arc` and release
/// the lock immediately. A reader keeps its snapshot alive across any later
/// `replace` or `clear`.
#[derive(Debug, Default)]
pub struct IndexStore {
    current: RwLock<Option<Arc<DocumentIndex>>>,
}

impl IndexStore {
    pub fn new() -> Self { Self::default() }

    /// Install `index`, discarding the previous document. Returns the replaced one.
    pub fn replace(&self, index: DocumentIndex) -> Option<Arc<DocumentIndex>> {
        let next = Arc::new(index);
        let previous = self.current.write().replace(next.clone());
        info!(
            file = next.file_name(),
            chunks = next.len(),
            replaced = previous.as_ref().map(|p| p.file_name()),
            "document index installed"
        );
        previous
    }

    /// Drop the active document. Idempotent; returns whether one was loaded.
    pub fn clear(&self) -> bool {
        let previous = self.current.write().take();
        if let Some(prev) = &previous {
            info!(file = prev.file_name(), "document index cleared");
        }
        previous.is_some()
    }

    pub fn snapshot(&self) -> Option<Arc<DocumentIndex>> {
        self.current.read().clone()
    }

    pub fn describe(&self) -> IndexStatus {
        self.snapshot().map(|index| index.status()).unwrap_or_default()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }
}
