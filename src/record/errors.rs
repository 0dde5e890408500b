//! Record error types
//!
//! Error codes:
//! - SCHOOL_UNKNOWN_KIND (REJECT)
//! - SCHOOL_INVALID_CODE (REJECT)
//! - SCHOOL_KIND_MISMATCH (REJECT)
//! - SCHOOL_RESERVED_FIELD (REJECT)
//! - SCHOOL_MISSING_FIELD (REJECT)
//! - SCHOOL_INVALID_FIELD (REJECT)

use thiserror::Error;

use super::kind::EntityKind;
use crate::errors::Severity;

/// Result type for record operations
pub type RecordResult<T> = Result<T, RecordError>;

/// Errors raised while building or converting records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("Unknown entity kind: {0}")]
    UnknownKind(String),

    #[error("Invalid code: {0:?} (expected a non-negative integer)")]
    InvalidCode(String),

    #[error("Expected a {expected} record, found {actual}")]
    KindMismatch {
        expected: EntityKind,
        actual: EntityKind,
    },

    #[error("Field {0} is managed by the store and cannot be set")]
    ReservedField(String),

    #[error("{kind} record is missing field {field}")]
    MissingField { kind: EntityKind, field: String },

    #[error("Field {field} is invalid: {reason}")]
    InvalidField { field: String, reason: String },
}

impl RecordError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            RecordError::UnknownKind(_) => "SCHOOL_UNKNOWN_KIND",
            RecordError::InvalidCode(_) => "SCHOOL_INVALID_CODE",
            RecordError::KindMismatch { .. } => "SCHOOL_KIND_MISMATCH",
            RecordError::ReservedField(_) => "SCHOOL_RESERVED_FIELD",
            RecordError::MissingField { .. } => "SCHOOL_MISSING_FIELD",
            RecordError::InvalidField { .. } => "SCHOOL_INVALID_FIELD",
        }
    }

    /// Record errors are always caller-correctable
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(RecordError::UnknownKind("x".into()).code(), "SCHOOL_UNKNOWN_KIND");
        assert_eq!(RecordError::InvalidCode("x".into()).code(), "SCHOOL_INVALID_CODE");
        assert_eq!(
            RecordError::ReservedField("codigo".into()).code(),
            "SCHOOL_RESERVED_FIELD"
        );
    }

    #[test]
    fn test_display_names_kinds() {
        let err = RecordError::KindMismatch {
            expected: EntityKind::Student,
            actual: EntityKind::Course,
        };
        let display = err.to_string();
        assert!(display.contains("alunos"));
        assert!(display.contains("disciplinas"));
        assert_eq!(err.severity(), Severity::Reject);
    }
}
