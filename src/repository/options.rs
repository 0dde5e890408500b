//! Repository behaviour switches

use std::fmt;
use std::str::FromStr;

use crate::table::AllocationPolicy;

/// What `update` does with a field name the stored record does not carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFieldPolicy {
    /// Log a warning, write the field, report it in the outcome
    #[default]
    Warn,
    /// Fail with `UnknownField` before anything is written
    Reject,
}

impl UnknownFieldPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnknownFieldPolicy::Warn => "warn",
            UnknownFieldPolicy::Reject => "reject",
        }
    }
}

impl fmt::Display for UnknownFieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnknownFieldPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warn" => Ok(UnknownFieldPolicy::Warn),
            "reject" => Ok(UnknownFieldPolicy::Reject),
            other => Err(format!(
                "Invalid unknown_fields policy: '{}'. Must be 'warn' or 'reject'.",
                other
            )),
        }
    }
}

/// Options fixed for the lifetime of a repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RepositoryOptions {
    pub allocation: AllocationPolicy,
    pub unknown_fields: UnknownFieldPolicy,
}
