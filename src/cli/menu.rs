//! Interactive console menu
//!
//! Two levels: pick an entity kind, then an operation on it. Options are
//! chosen by number or by name; `9` goes back (or exits at the top level)
//! and end of input exits from anywhere.
//!
//! Rejections (invalid input, duplicate identifier, unknown code) are
//! printed and the menu carries on. Any other error ends the session.

use std::io::{BufRead, Write};

use super::errors::{CliError, CliResult};
use super::input::{field_label, normalize_field, parse_code};
use crate::record::{EntityKind, Fields, Record, CODE_KEY};
use crate::repository::Repository;

const BACK: &str = "9";

/// Whether the session continues after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Include,
    List,
    Update,
    Delete,
}

impl Operation {
    const ALL: [Operation; 4] = [
        Operation::Include,
        Operation::List,
        Operation::Update,
        Operation::Delete,
    ];

    fn label(&self) -> &'static str {
        match self {
            Operation::Include => "Include",
            Operation::List => "List",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
        }
    }

    fn parse(choice: &str) -> Option<Self> {
        match choice.to_lowercase().as_str() {
            "1" | "include" | "insert" => Some(Operation::Include),
            "2" | "list" => Some(Operation::List),
            "3" | "update" => Some(Operation::Update),
            "4" | "delete" => Some(Operation::Delete),
            _ => None,
        }
    }
}

fn parse_kind(choice: &str) -> Option<EntityKind> {
    match choice.parse::<usize>() {
        Ok(n) if (1..=EntityKind::ALL.len()).contains(&n) => Some(EntityKind::ALL[n - 1]),
        Ok(_) => None,
        Err(_) => choice.parse().ok(),
    }
}

/// Renders a record as one line: `CODIGO:1; NOME:Ana; CPF:12345678901`
pub fn format_record(record: &Record) -> String {
    let code = record.code().map(|c| c.to_string()).unwrap_or_default();
    let mut parts = vec![format!("{}:{}", field_label(CODE_KEY), code)];
    for (name, value) in record.fields() {
        parts.push(format!(
            "{}:{}",
            field_label(name),
            value.as_deref().unwrap_or("")
        ));
    }
    parts.join("; ")
}

/// Menu session over arbitrary input and output streams
pub struct Menu<'a, R, W> {
    repository: &'a Repository,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(repository: &'a Repository, input: R, output: W) -> Self {
        Self {
            repository,
            input,
            output,
        }
    }

    /// Runs until the user exits or input ends.
    pub fn run(&mut self) -> CliResult<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "==== SCHOOL REGISTRY ====")?;
            for (i, kind) in EntityKind::ALL.iter().enumerate() {
                writeln!(self.output, "{}. {}", i + 1, capitalize(kind.label()))?;
            }
            writeln!(self.output, "{}. Exit", BACK)?;

            let choice = match self.prompt("Choose an option")? {
                Some(choice) => choice,
                None => return Ok(()),
            };
            if choice == BACK || choice.eq_ignore_ascii_case("exit") {
                return Ok(());
            }
            match parse_kind(&choice) {
                Some(kind) => {
                    if self.operations(kind)? == Flow::Exit {
                        return Ok(());
                    }
                }
                None => writeln!(self.output, "Invalid option: {}", choice)?,
            }
        }
    }

    fn operations(&mut self, kind: EntityKind) -> CliResult<Flow> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "==== {} ====", kind.label().to_uppercase())?;
            for (i, operation) in Operation::ALL.iter().enumerate() {
                writeln!(self.output, "{}. {}", i + 1, operation.label())?;
            }
            writeln!(self.output, "{}. Back", BACK)?;

            let choice = match self.prompt("Choose an option")? {
                Some(choice) => choice,
                None => return Ok(Flow::Exit),
            };
            if choice == BACK || choice.eq_ignore_ascii_case("back") {
                return Ok(Flow::Continue);
            }
            let operation = match Operation::parse(&choice) {
                Some(operation) => operation,
                None => {
                    writeln!(self.output, "Invalid option: {}", choice)?;
                    continue;
                }
            };

            let result = match operation {
                Operation::Include => self.include(kind),
                Operation::List => self.list(kind),
                Operation::Update => self.update(kind),
                Operation::Delete => self.delete(kind),
            };
            match result {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(Flow::Exit),
                Err(e) if e.is_rejection() => writeln!(self.output, "Error: {}", e)?,
                Err(e) => return Err(e),
            }
        }
    }

    fn include(&mut self, kind: EntityKind) -> CliResult<Flow> {
        let mut record = Record::new(kind);
        for field in kind.field_names() {
            let value = match self.prompt_field(kind, field, None)? {
                Some(value) => value,
                None => return Ok(Flow::Exit),
            };
            record.set(*field, value)?;
        }

        let code = self.repository.insert(record)?;
        writeln!(
            self.output,
            "{} registered with code {}.",
            capitalize(kind.singular()),
            code
        )?;
        Ok(Flow::Continue)
    }

    fn list(&mut self, kind: EntityKind) -> CliResult<Flow> {
        let records = self.repository.list(kind)?;
        if records.is_empty() {
            writeln!(self.output, "No {} registered.", kind.label())?;
        }
        for record in &records {
            writeln!(self.output, "{}", format_record(record))?;
        }
        Ok(Flow::Continue)
    }

    fn update(&mut self, kind: EntityKind) -> CliResult<Flow> {
        let record = match self.select(kind)? {
            Some(record) => record,
            None => return Ok(Flow::Exit),
        };
        let code = record
            .code()
            .ok_or_else(|| CliError::invalid_input("stored record has no code"))?;

        writeln!(self.output, "Leave a field empty to keep its current value.")?;
        let mut changes = Fields::new();
        for field in kind.field_names() {
            let current = record.get(field);
            let value = match self.prompt_field(kind, field, Some(current.unwrap_or("")))? {
                Some(value) => value,
                None => return Ok(Flow::Exit),
            };
            if value.as_deref() != current && value.is_some() {
                changes.insert(field.to_string(), value);
            }
        }

        if changes.is_empty() {
            writeln!(self.output, "Nothing to change.")?;
            return Ok(Flow::Continue);
        }
        self.repository.update(kind, code, &changes)?;
        writeln!(self.output, "{} {} updated.", capitalize(kind.singular()), code)?;
        Ok(Flow::Continue)
    }

    fn delete(&mut self, kind: EntityKind) -> CliResult<Flow> {
        let record = match self.select(kind)? {
            Some(record) => record,
            None => return Ok(Flow::Exit),
        };
        let code = record
            .code()
            .ok_or_else(|| CliError::invalid_input("stored record has no code"))?;

        let answer = match self.prompt("Confirm deletion? (y/n)")? {
            Some(answer) => answer,
            None => return Ok(Flow::Exit),
        };
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            writeln!(self.output, "Deletion cancelled.")?;
            return Ok(Flow::Continue);
        }

        self.repository.delete(kind, code)?;
        writeln!(self.output, "{} {} deleted.", capitalize(kind.singular()), code)?;
        Ok(Flow::Continue)
    }

    /// Asks for a code and shows the record it names.
    ///
    /// `None` when input ends.
    fn select(&mut self, kind: EntityKind) -> CliResult<Option<Record>> {
        let raw = match self.prompt(&format!("{} code", capitalize(kind.singular())))? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        let record = self.repository.get(kind, parse_code(&raw)?)?;
        writeln!(self.output, "{}", format_record(&record))?;
        Ok(Some(record))
    }

    /// Prompts until the value for `field` is valid.
    ///
    /// With `current` set, an empty answer keeps the value and yields
    /// `Some(None)`. Outer `None` means input ended.
    fn prompt_field(
        &mut self,
        kind: EntityKind,
        field: &str,
        current: Option<&str>,
    ) -> CliResult<Option<Option<String>>> {
        let label = match current {
            Some(current) => format!("{} [{}]", field_label(field), current),
            None => field_label(field),
        };
        loop {
            let raw = match self.prompt(&label)? {
                Some(raw) => raw,
                None => return Ok(None),
            };
            if current.is_some() && raw.trim().is_empty() {
                return Ok(Some(None));
            }
            match normalize_field(kind, field, &raw) {
                Ok(value) => return Ok(Some(Some(value))),
                Err(e) if e.is_rejection() => writeln!(self.output, "Error: {}", e)?,
                Err(e) => return Err(e),
            }
        }
    }

    /// Writes `label: ` and reads one line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> CliResult<Option<String>> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MemoryBackend;
    use std::io::Cursor;

    fn session(repository: &Repository, script: &str) -> String {
        let mut output = Vec::new();
        Menu::new(repository, Cursor::new(script.as_bytes()), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_parse_choices() {
        assert_eq!(parse_kind("1"), Some(EntityKind::Student));
        assert_eq!(parse_kind("5"), Some(EntityKind::Enrollment));
        assert_eq!(parse_kind("professores"), Some(EntityKind::Teacher));
        assert_eq!(parse_kind("6"), None);
        assert_eq!(parse_kind("0"), None);
        assert_eq!(Operation::parse("LIST"), Some(Operation::List));
        assert_eq!(Operation::parse("4"), Some(Operation::Delete));
        assert_eq!(Operation::parse("erase"), None);
    }

    #[test]
    fn test_format_record() {
        let mut record = Record::from_pairs(
            EntityKind::Student,
            &[("nome", "Ana"), ("cpf", "12345678901")],
        )
        .unwrap();
        record.assign_code(crate::record::Code::new(1));
        assert_eq!(format_record(&record), "CODIGO:1; NOME:Ana; CPF:12345678901");
    }

    #[test]
    fn test_exit_immediately() {
        let repository = Repository::new(MemoryBackend::new());
        let output = session(&repository, "9\n");
        assert!(output.contains("SCHOOL REGISTRY"));
        assert!(repository.list(EntityKind::Student).unwrap().is_empty());
    }

    #[test]
    fn test_end_of_input_exits() {
        let repository = Repository::new(MemoryBackend::new());
        session(&repository, "1\n1\nAna\n");
        assert!(repository.list(EntityKind::Student).unwrap().is_empty());
    }

    #[test]
    fn test_include_reprompts_invalid_values() {
        let repository = Repository::new(MemoryBackend::new());
        let output = session(&repository, "1\n1\nA\nAna  Silva\n123\n123.456.789-01\n9\n9\n");
        assert!(output.contains("Student registered with code 1."));
        assert!(output.contains("Error: Invalid input"));

        let records = repository.list(EntityKind::Student).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("nome"), Some("Ana Silva"));
        assert_eq!(records[0].get("cpf"), Some("12345678901"));
    }

    #[test]
    fn test_invalid_option() {
        let repository = Repository::new(MemoryBackend::new());
        let output = session(&repository, "7\n1\n8\n9\n9\n");
        assert_eq!(output.matches("Invalid option").count(), 2);
    }
}
