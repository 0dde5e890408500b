//! Repository error types
//!
//! Error codes:
//! - SCHOOL_DUPLICATE_IDENTIFIER (REJECT)
//! - SCHOOL_TABLE_NOT_FOUND (REJECT)
//! - SCHOOL_NOT_FOUND (REJECT)
//! - SCHOOL_UNKNOWN_FIELD (REJECT, only under the reject policy)
//! - document and record codes pass through unchanged

use thiserror::Error;

use crate::document::StoreError;
use crate::errors::Severity;
use crate::record::{Code, EntityKind, RecordError};

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Outcome of a failed CRUD operation
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("Identifier {identifier} is already registered in {table}")]
    DuplicateIdentifier {
        table: EntityKind,
        identifier: String,
    },

    #[error("Table {0} not found")]
    TableNotFound(EntityKind),

    #[error("Record {code} not found in {table}")]
    NotFound { table: EntityKind, code: Code },

    #[error("No code left to allocate in {0}")]
    CodeSpaceExhausted(EntityKind),

    #[error("Record {code} in {table} has no field {field}")]
    UnknownField {
        table: EntityKind,
        code: Code,
        field: String,
    },
}

impl RepositoryError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RepositoryError::Store(e) => e.code(),
            RepositoryError::Record(e) => e.code(),
            RepositoryError::DuplicateIdentifier { .. } => "SCHOOL_DUPLICATE_IDENTIFIER",
            RepositoryError::TableNotFound(_) => "SCHOOL_TABLE_NOT_FOUND",
            RepositoryError::NotFound { .. } => "SCHOOL_NOT_FOUND",
            RepositoryError::UnknownField { .. } => "SCHOOL_UNKNOWN_FIELD",
            RepositoryError::CodeSpaceExhausted(_) => "SCHOOL_CODE_SPACE_EXHAUSTED",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            RepositoryError::Store(e) => e.severity(),
            RepositoryError::Record(e) => e.severity(),
            RepositoryError::CodeSpaceExhausted(_) => Severity::Error,
            _ => Severity::Reject,
        }
    }

    /// Whether the caller can correct its input and retry
    pub fn is_rejection(&self) -> bool {
        self.severity() == Severity::Reject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections() {
        let err = RepositoryError::DuplicateIdentifier {
            table: EntityKind::Student,
            identifier: "12345678901".into(),
        };
        assert!(err.is_rejection());
        assert_eq!(err.code(), "SCHOOL_DUPLICATE_IDENTIFIER");
        assert!(err.to_string().contains("12345678901"));

        let err = RepositoryError::NotFound {
            table: EntityKind::Course,
            code: Code::new(9),
        };
        assert!(err.is_rejection());
        assert_eq!(err.to_string(), "Record 9 not found in disciplinas");
    }

    #[test]
    fn test_store_errors_pass_through() {
        let err: RepositoryError = StoreError::parse("data.json", "bad").into();
        assert_eq!(err.code(), "SCHOOL_DOCUMENT_CORRUPT");
        assert_eq!(err.severity(), Severity::Fatal);
        assert!(!err.is_rejection());
    }
}
