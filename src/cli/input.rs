//! Normalisation of user-typed field values
//!
//! The store trusts its callers; format checks live here.
//!
//! - Every value: leading/trailing whitespace trimmed, internal runs collapsed
//! - Names: must not be empty or a single character
//! - Identifiers: `.` and `-` removed, then exactly 11 digits
//! - References: a non-negative integer code

use super::errors::{CliError, CliResult};
use crate::record::{Code, EntityKind, FIELD_CPF, FIELD_NAME};

/// Length of a national identifier after normalisation
pub const CPF_LEN: usize = 11;

/// Collapses whitespace runs to single spaces and trims the ends.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn normalize_name(raw: &str) -> CliResult<String> {
    let name = collapse_whitespace(raw);
    if name.chars().count() <= 1 {
        return Err(CliError::invalid_input(format!("name {:?} is invalid", name)));
    }
    Ok(name)
}

pub fn normalize_cpf(raw: &str) -> CliResult<String> {
    let cpf: String = collapse_whitespace(raw)
        .chars()
        .filter(|c| *c != '.' && *c != '-')
        .collect();
    if cpf.len() != CPF_LEN || !cpf.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CliError::invalid_input(format!(
            "CPF {:?} is invalid, expected {} digits",
            raw.trim(),
            CPF_LEN
        )));
    }
    Ok(cpf)
}

pub fn parse_code(raw: &str) -> CliResult<Code> {
    let value = collapse_whitespace(raw);
    value
        .parse()
        .map_err(|_| CliError::invalid_input(format!("code {:?} is not a number", value)))
}

pub fn normalize_reference(raw: &str) -> CliResult<String> {
    parse_code(raw).map(|code| code.to_string())
}

/// Normalises `raw` according to what `field` holds for `kind`.
///
/// Fields the kind does not declare are only whitespace-collapsed.
pub fn normalize_field(kind: EntityKind, field: &str, raw: &str) -> CliResult<String> {
    match field {
        FIELD_NAME => normalize_name(raw),
        FIELD_CPF => normalize_cpf(raw),
        f if kind.field_names().iter().any(|name| *name == f) => normalize_reference(raw),
        _ => Ok(collapse_whitespace(raw)),
    }
}

/// Prompt label for a field: `codigo_da_turma` -> `CODIGO DA TURMA`
pub fn field_label(field: &str) -> String {
    field.to_uppercase().replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FIELD_TEACHER_CODE;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Ana   Maria \t Silva "), "Ana Maria Silva");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(normalize_name(" Ana  Silva ").unwrap(), "Ana Silva");
        assert!(normalize_name("A").is_err());
        assert!(normalize_name("   ").is_err());
        assert_eq!(normalize_name("Al").unwrap(), "Al");
    }

    #[test]
    fn test_cpf_rules() {
        assert_eq!(normalize_cpf("123.456.789-01").unwrap(), "12345678901");
        assert_eq!(normalize_cpf(" 12345678901 ").unwrap(), "12345678901");
        assert!(normalize_cpf("1234567890").is_err());
        assert!(normalize_cpf("1234567890a").is_err());
        assert!(normalize_cpf("123 456 789 01").is_err());
    }

    #[test]
    fn test_reference_rules() {
        assert_eq!(normalize_reference(" 3 ").unwrap(), "3");
        assert!(normalize_reference("three").is_err());
        assert!(normalize_reference("-1").is_err());
    }

    #[test]
    fn test_normalize_field_dispatch() {
        assert_eq!(
            normalize_field(EntityKind::Class, FIELD_TEACHER_CODE, "07").unwrap(),
            "7"
        );
        assert_eq!(
            normalize_field(EntityKind::Student, "email", "  a@b  ").unwrap(),
            "a@b"
        );
        assert!(normalize_field(EntityKind::Teacher, FIELD_CPF, "123").is_err());
    }

    #[test]
    fn test_field_label() {
        assert_eq!(field_label("codigo_da_turma"), "CODIGO DA TURMA");
        assert_eq!(field_label("nome"), "NOME");
    }
}
