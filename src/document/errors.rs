//! Document store error types
//!
//! Error codes:
//! - SCHOOL_STORAGE_IO_ERROR (ERROR severity)
//! - SCHOOL_SERIALIZE_FAILED (ERROR severity)
//! - SCHOOL_LOCK_FAILED (ERROR severity)
//! - SCHOOL_DOCUMENT_CORRUPT (FATAL severity)

use std::io;

use thiserror::Error;

use crate::errors::Severity;

/// Result type for document store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures of the persisted document
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Document {path} is not well-formed: {reason}")]
    Parse { path: String, reason: String },

    #[error("Failed to serialize document: {0}")]
    Serialize(String),

    #[error("Failed to lock {path}: {source}")]
    Lock {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub fn io(path: impl Into<String>, source: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Parse {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Io { .. } => "SCHOOL_STORAGE_IO_ERROR",
            StoreError::Parse { .. } => "SCHOOL_DOCUMENT_CORRUPT",
            StoreError::Serialize(_) => "SCHOOL_SERIALIZE_FAILED",
            StoreError::Lock { .. } => "SCHOOL_LOCK_FAILED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            StoreError::Parse { .. } => Severity::Fatal,
            _ => Severity::Error,
        }
    }

    /// Whether the store is unusable until the document is repaired
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}
