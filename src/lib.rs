//! schooldb - school registry backed by a single JSON document
//!
//! Five record kinds (students, teachers, courses, classes, enrollments)
//! live as tables of one JSON file. Every operation loads the whole
//! document, works on one table and, if it changed anything, saves the
//! whole document back.
//!
//! Layers, leaves first:
//! - `record`: entity kinds, codes, records
//! - `table`: records plus the uniqueness registry and code allocation
//! - `document`: the persisted document and its backends
//! - `repository`: CRUD over the document
//! - `cli`: one-shot commands and the interactive menu

pub mod cli;
pub mod document;
pub mod errors;
pub mod observability;
pub mod record;
pub mod repository;
pub mod table;
