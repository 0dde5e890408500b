//! CLI argument definitions using clap
//!
//! Commands:
//! - schooldb [menu]
//! - schooldb insert <kind> --field name=value...
//! - schooldb list <kind>
//! - schooldb get <kind> <code>
//! - schooldb update <kind> <code> --field name=value...
//! - schooldb delete <kind> <code>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::record::{Code, EntityKind};

/// schooldb - school registry backed by a single JSON document
#[derive(Parser, Debug)]
#[command(name = "schooldb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the data file (overrides the configuration)
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Interactive menu (default)
    Menu,

    /// Register a new record
    Insert {
        /// Entity kind: students, teachers, courses, classes, enrollments
        kind: EntityKind,

        /// Field value as name=value, repeatable
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// List every record of a kind
    List {
        kind: EntityKind,
    },

    /// Show one record
    Get {
        kind: EntityKind,
        code: Code,
    },

    /// Overwrite fields of a record
    Update {
        kind: EntityKind,
        code: Code,

        /// Field value as name=value, repeatable
        #[arg(long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },

    /// Remove a record
    Delete {
        kind: EntityKind,
        code: Code,
    },
}

/// Parses `name=value`; the value may contain further `=`.
pub fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected name=value, got {:?}", raw)),
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field() {
        assert_eq!(
            parse_field("nome=Ana Silva"),
            Ok(("nome".to_string(), "Ana Silva".to_string()))
        );
        assert_eq!(parse_field("a=b=c"), Ok(("a".to_string(), "b=c".to_string())));
        assert!(parse_field("nome").is_err());
        assert!(parse_field("=x").is_err());
    }

    #[test]
    fn test_parse_insert() {
        let cli = Cli::try_parse_from([
            "schooldb",
            "--data-file",
            "school.json",
            "insert",
            "students",
            "--field",
            "nome=Ana",
            "--field",
            "cpf=12345678901",
        ])
        .unwrap();
        assert_eq!(cli.data_file, Some(PathBuf::from("school.json")));
        match cli.command {
            Some(Command::Insert { kind, fields }) => {
                assert_eq!(kind, EntityKind::Student);
                assert_eq!(fields.len(), 2);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_delete_with_table_name() {
        let cli = Cli::try_parse_from(["schooldb", "delete", "alunos", "3"]).unwrap();
        match cli.command {
            Some(Command::Delete { kind, code }) => {
                assert_eq!(kind, EntityKind::Student);
                assert_eq!(code, Code::new(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand_means_menu() {
        let cli = Cli::try_parse_from(["schooldb"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_rejects_bad_kind_and_code() {
        assert!(Cli::try_parse_from(["schooldb", "list", "staff"]).is_err());
        assert!(Cli::try_parse_from(["schooldb", "get", "alunos", "x"]).is_err());
    }
}
