//! Severity levels shared by every subsystem error
//!
//! - Reject: the caller can correct its input and retry
//! - Error: the operation failed, the store is untouched
//! - Fatal: the persisted document cannot be trusted

use std::fmt;

/// Severity of a failed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Request rejected, caller retains its input
    Reject,
    /// Operation failed
    Error,
    /// Store is unusable until repaired
    Fatal,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Reject => "REJECT",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
