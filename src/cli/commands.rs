//! CLI command implementations
//!
//! Every command resolves the configuration, opens the repository it
//! describes and runs exactly one repository operation per store cycle.
//! One-shot commands answer with a single JSON line on stdout; the menu
//! talks plain text.

use std::io::{self, Write};

use serde_json::{json, Value};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::input::normalize_field;
use super::io::{write_error, write_response};
use super::menu::Menu;
use crate::observability::Logger;
use crate::record::{EntityKind, Fields, Record, RecordError};
use crate::repository::Repository;

/// Entry point used by the binary
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cli: Cli) -> CliResult<()> {
    let config = Config::resolve(cli.config.as_deref(), cli.data_file.as_deref())?;
    Logger::set_threshold(config.log_level()?);
    let repository = config.open_repository()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        None | Some(Command::Menu) => {
            let stdin = io::stdin();
            Menu::new(&repository, stdin.lock(), &mut out).run()
        }
        Some(command) => execute(&repository, command, &mut out),
    }
}

/// Runs a one-shot command and writes its JSON response.
///
/// A failed command writes an error response and is also returned as `Err`
/// so the process exits non-zero.
pub fn execute<W: Write>(repository: &Repository, command: Command, out: &mut W) -> CliResult<()> {
    match dispatch(repository, command) {
        Ok(data) => write_response(out, data),
        Err(e) => {
            write_error(out, e.code(), &e.to_string())?;
            Err(e)
        }
    }
}

fn dispatch(repository: &Repository, command: Command) -> CliResult<Value> {
    match command {
        Command::Menu => Err(CliError::invalid_input(
            "menu is interactive and cannot run as a one-shot command",
        )),

        Command::Insert { kind, fields } => {
            let record = build_record(kind, &fields)?;
            let code = repository.insert(record)?;
            Ok(json!({"table": kind.table_name(), "codigo": code.value()}))
        }

        Command::List { kind } => {
            let records = repository.list(kind)?;
            Ok(Value::Array(records.iter().map(Record::to_json).collect()))
        }

        Command::Get { kind, code } => Ok(repository.get(kind, code)?.to_json()),

        Command::Update { kind, code, fields } => {
            let fields = build_fields(kind, &fields)?;
            if fields.is_empty() {
                return Err(CliError::invalid_input("update needs at least one --field"));
            }
            let outcome = repository.update(kind, code, &fields)?;
            Ok(json!({
                "table": kind.table_name(),
                "codigo": outcome.code.value(),
                "unknown_fields": outcome.unknown_fields,
            }))
        }

        Command::Delete { kind, code } => {
            let record = repository.delete(kind, code)?;
            Ok(json!({"deleted": record.to_json()}))
        }
    }
}

/// Normalises `name=value` pairs for `kind`; later duplicates win.
fn build_fields(kind: EntityKind, pairs: &[(String, String)]) -> CliResult<Fields> {
    let mut fields = Fields::new();
    for (name, raw) in pairs {
        let value = normalize_field(kind, name, raw)?;
        fields.insert(name.clone(), Some(value));
    }
    Ok(fields)
}

/// Builds a new record, requiring every field the kind declares.
fn build_record(kind: EntityKind, pairs: &[(String, String)]) -> CliResult<Record> {
    let mut record = Record::new(kind);
    for (name, value) in build_fields(kind, pairs)? {
        record.set(name, value)?;
    }
    if let Some(missing) = kind
        .field_names()
        .iter()
        .find(|field| record.get(field).is_none())
    {
        return Err(RecordError::MissingField {
            kind,
            field: missing.to_string(),
        }
        .into());
    }
    Ok(record)
}
