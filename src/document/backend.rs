//! # Document Backend Trait

use std::fmt;
use std::sync::Arc;

use super::document::Document;
use super::errors::StoreResult;

/// Where the document lives.
///
/// `load` returns an empty document when nothing has been persisted yet and
/// fails with a parse error when the persisted state is not well-formed.
/// `save` replaces the persisted state wholesale; the last successful save wins.
pub trait DocumentBackend: Send + Sync + fmt::Debug {
    /// Read the full document
    fn load(&self) -> StoreResult<Document>;

    /// Replace the full document
    fn save(&self, document: &Document) -> StoreResult<()>;

    /// Human-readable location, used in logs
    fn location(&self) -> String;
}

impl<B: DocumentBackend + ?Sized> DocumentBackend for Arc<B> {
    fn load(&self) -> StoreResult<Document> {
        (**self).load()
    }

    fn save(&self, document: &Document) -> StoreResult<()> {
        (**self).save(document)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}
