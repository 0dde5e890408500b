//! CLI module for schooldb
//!
//! Provides command-line interface for:
//! - menu: interactive console menu (default)
//! - insert, list, get, update, delete: one-shot commands with JSON output

mod args;
mod commands;
mod config;
mod errors;
mod input;
mod io;
mod menu;

pub use args::{parse_field, Cli, Command};
pub use commands::{execute, run, run_command};
pub use config::Config;
pub use errors::{CliError, CliResult};
pub use input::{
    collapse_whitespace, field_label, normalize_cpf, normalize_field, normalize_name,
    normalize_reference, parse_code,
};
pub use io::{write_error, write_response};
pub use menu::{format_record, Menu};
