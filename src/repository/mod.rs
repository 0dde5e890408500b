//! Repository subsystem: the entity lifecycle over the document store
//!
//! A record is `absent -> active -> (updated)* -> absent`. Deleted codes are
//! never revived; a later insert may reuse the numeric value under legacy
//! allocation, but that is a new record.
//!
//! # Invariants Enforced
//!
//! - A table's registry holds exactly the identifiers of its live records
//! - A rejected or failed operation writes nothing
//! - `table_name` and `codigo` are never overwritten by an update

mod errors;
mod options;
#[allow(clippy::module_inception)]
mod repository;

pub use errors::{RepositoryError, RepositoryResult};
pub use options::{RepositoryOptions, UnknownFieldPolicy};
pub use repository::{Repository, UpdateOutcome};
