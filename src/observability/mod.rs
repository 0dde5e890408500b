//! Observability subsystem
//!
//! Structured JSON logging for store operations. Logging is synchronous,
//! has no side effects on the operation being logged, and never fails the
//! caller.
//!
//! # Usage
//!
//! ```ignore
//! use schooldb::observability::{Logger, LogLevel};
//!
//! Logger::set_threshold(LogLevel::Info);
//! Logger::info("RECORD_INSERTED", &[("table", "alunos"), ("code", "1")]);
//! ```

mod logger;

pub use logger::{LogLevel, Logger};
