//! Document Store subsystem
//!
//! The document is the entire persisted state: one JSON object keyed by table
//! name. It is loaded in full at the start of every operation and replaced in
//! full at the end; nothing is cached between operations.
//!
//! # Design Principles
//!
//! - Whole-document reads and writes, no partial updates
//! - Missing document loads as empty
//! - Malformed document is fatal, never silently empty
//! - Last successful save wins
//! - Cross-process exclusion is an injected [`StoreLock`], not assumed

mod backend;
#[allow(clippy::module_inception)]
mod document;
mod errors;
mod json_file;
mod lock;
mod memory;

pub use backend::DocumentBackend;
pub use document::Document;
pub use errors::{StoreError, StoreResult};
pub use json_file::JsonFileBackend;
pub use lock::{FileLock, LockGuard, NoLock, StoreLock};
pub use memory::MemoryBackend;
