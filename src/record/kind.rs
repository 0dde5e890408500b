//! Entity kinds and record codes
//!
//! Each kind owns one table in the document. The table name, the field list
//! and the identifier field are fixed per kind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::{RecordError, RecordResult};

/// Key holding the record code inside a persisted record
pub const CODE_KEY: &str = "codigo";
/// Key holding the table name inside a persisted record
pub const KIND_KEY: &str = "table_name";

/// Full name of a student or teacher, or the name of a course
pub const FIELD_NAME: &str = "nome";
/// National identifier (11 digits)
pub const FIELD_CPF: &str = "cpf";
/// Teacher referenced by a class
pub const FIELD_TEACHER_CODE: &str = "codigo_do_professor";
/// Course referenced by a class
pub const FIELD_COURSE_CODE: &str = "codigo_da_disciplina";
/// Class referenced by an enrollment
pub const FIELD_CLASS_CODE: &str = "codigo_da_turma";
/// Student referenced by an enrollment
pub const FIELD_STUDENT_CODE: &str = "codigo_do_estudante";

/// The five entity kinds stored in the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Student,
    Teacher,
    Course,
    Class,
    Enrollment,
}

impl EntityKind {
    /// All kinds in menu order
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Student,
        EntityKind::Teacher,
        EntityKind::Course,
        EntityKind::Class,
        EntityKind::Enrollment,
    ];

    /// Name of the table holding records of this kind
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Student => "alunos",
            EntityKind::Teacher => "professores",
            EntityKind::Course => "disciplinas",
            EntityKind::Class => "turmas",
            EntityKind::Enrollment => "matriculas",
        }
    }

    /// Resolves a persisted table name
    pub fn from_table_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.table_name() == name)
    }

    /// Human-readable plural label
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Student => "students",
            EntityKind::Teacher => "teachers",
            EntityKind::Course => "courses",
            EntityKind::Class => "classes",
            EntityKind::Enrollment => "enrollments",
        }
    }

    /// Human-readable singular label
    pub fn singular(&self) -> &'static str {
        match self {
            EntityKind::Student => "student",
            EntityKind::Teacher => "teacher",
            EntityKind::Course => "course",
            EntityKind::Class => "class",
            EntityKind::Enrollment => "enrollment",
        }
    }

    /// Fields a record of this kind carries, excluding code and kind
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            EntityKind::Student | EntityKind::Teacher => &[FIELD_NAME, FIELD_CPF],
            EntityKind::Course => &[FIELD_NAME],
            EntityKind::Class => &[FIELD_TEACHER_CODE, FIELD_COURSE_CODE],
            EntityKind::Enrollment => &[FIELD_CLASS_CODE, FIELD_STUDENT_CODE],
        }
    }

    /// Field subject to the per-table uniqueness constraint
    pub fn identifier_field(&self) -> Option<&'static str> {
        match self {
            EntityKind::Student | EntityKind::Teacher => Some(FIELD_CPF),
            _ => None,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for EntityKind {
    type Err = RecordError;

    /// Accepts the table name or the English singular/plural, any case.
    fn from_str(s: &str) -> RecordResult<Self> {
        let lowered = s.trim().to_lowercase();
        if let Some(kind) = Self::from_table_name(&lowered) {
            return Ok(kind);
        }
        match lowered.as_str() {
            "student" | "students" => Ok(EntityKind::Student),
            "teacher" | "teachers" => Ok(EntityKind::Teacher),
            "course" | "courses" => Ok(EntityKind::Course),
            "class" | "classes" => Ok(EntityKind::Class),
            "enrollment" | "enrollments" => Ok(EntityKind::Enrollment),
            _ => Err(RecordError::UnknownKind(s.to_string())),
        }
    }
}

/// Per-table integer identifying a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Code(u64);

impl Code {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// The code immediately after this one; `None` past `u64::MAX`
    pub fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Code {
    type Err = RecordError;

    fn from_str(s: &str) -> RecordResult<Self> {
        let trimmed = s.trim();
        // u64::from_str accepts a leading '+', codes are digits only
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(RecordError::InvalidCode(s.to_string()));
        }
        trimmed
            .parse::<u64>()
            .map(Code)
            .map_err(|_| RecordError::InvalidCode(s.to_string()))
    }
}

impl From<u64> for Code {
    fn from(value: u64) -> Self {
        Self(value)
    }
}
