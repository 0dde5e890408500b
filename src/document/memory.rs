//! # In-Memory Backend
//!
//! Holds the serialized document text, so every load and save goes through
//! the same JSON encoding as the file backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::backend::DocumentBackend;
use super::document::Document;
use super::errors::StoreResult;

const LOCATION: &str = "<memory>";

/// Document held in process memory
#[derive(Debug, Default)]
pub struct MemoryBackend {
    text: Mutex<Option<String>>,
    saves: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from raw persisted text, well-formed or not.
    pub fn with_contents(text: impl Into<String>) -> Self {
        Self {
            text: Mutex::new(Some(text.into())),
            saves: AtomicUsize::new(0),
        }
    }

    /// Current persisted text, `None` if nothing was ever saved
    pub fn contents(&self) -> Option<String> {
        (*self.state()).clone()
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn state(&self) -> MutexGuard<'_, Option<String>> {
        self.text.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentBackend for MemoryBackend {
    fn load(&self) -> StoreResult<Document> {
        match self.state().as_deref() {
            Some(text) => Document::from_json_str(text, LOCATION),
            None => Ok(Document::new()),
        }
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        let text = document.to_json_string()?;
        *self.state() = Some(text);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn location(&self) -> String {
        LOCATION.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EntityKind;

    #[test]
    fn test_fresh_backend_is_empty() {
        let backend = MemoryBackend::new();
        assert!(backend.load().unwrap().is_empty());
        assert_eq!(backend.contents(), None);
        assert_eq!(backend.save_count(), 0);
    }

    #[test]
    fn test_save_then_load() {
        let backend = MemoryBackend::new();
        let mut document = Document::new();
        document.ensure_table(EntityKind::Teacher).ensure_registry();

        backend.save(&document).unwrap();
        assert_eq!(backend.load().unwrap(), document);
        assert_eq!(backend.save_count(), 1);
    }

    #[test]
    fn test_malformed_contents() {
        let backend = MemoryBackend::with_contents("not json");
        assert!(backend.load().unwrap_err().is_fatal());
    }
}
