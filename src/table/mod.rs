//! Table subsystem
//!
//! A table holds every record of one entity kind, keyed by code, together
//! with its reserved entries:
//!
//! - `CPFS`: the uniqueness registry of identifier values in use
//! - `SEQ`: the last issued code, present only under monotonic allocation
//!
//! # Invariants
//!
//! - Reserved keys are never record codes
//! - An identifier value appears at most once in the registry
//! - Allocation never returns a code held by a live record

mod allocator;
mod registry;
#[allow(clippy::module_inception)]
mod table;

pub use allocator::AllocationPolicy;
pub use registry::UniquenessRegistry;
pub use table::{Table, REGISTRY_KEY, SEQUENCE_KEY};
