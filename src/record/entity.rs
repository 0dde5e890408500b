//! Typed entity variants
//!
//! Each entity kind has a fixed, named field list. [`Entity`] is the common
//! capability: converting to and from the dynamic [`Record`] the store
//! persists. The repository's typed operations go through this trait.

use super::errors::{RecordError, RecordResult};
use super::kind::{
    Code, EntityKind, FIELD_CLASS_CODE, FIELD_COURSE_CODE, FIELD_CPF, FIELD_NAME,
    FIELD_STUDENT_CODE, FIELD_TEACHER_CODE,
};
use super::record::Record;

/// An entity kind with a fixed field list
pub trait Entity: Sized {
    /// Kind tag, selects the table
    const KIND: EntityKind;

    /// Builds the unsaved dynamic record for this entity.
    fn to_record(&self) -> RecordResult<Record>;

    /// Reads the entity back from a stored record.
    fn from_record(record: &Record) -> RecordResult<Self>;
}

fn expect_kind(record: &Record, expected: EntityKind) -> RecordResult<()> {
    if record.kind() != expected {
        return Err(RecordError::KindMismatch {
            expected,
            actual: record.kind(),
        });
    }
    Ok(())
}

fn required(record: &Record, field: &str) -> RecordResult<String> {
    record
        .get(field)
        .map(str::to_string)
        .ok_or_else(|| RecordError::MissingField {
            kind: record.kind(),
            field: field.to_string(),
        })
}

fn required_code(record: &Record, field: &str) -> RecordResult<Code> {
    let raw = required(record, field)?;
    raw.parse().map_err(|_| RecordError::InvalidField {
        field: field.to_string(),
        reason: format!("{:?} is not a record code", raw),
    })
}

fn build(kind: EntityKind, pairs: &[(&str, String)]) -> RecordResult<Record> {
    let mut record = Record::new(kind);
    for (name, value) in pairs {
        record.set(*name, Some(value.clone()))?;
    }
    Ok(record)
}

/// A registered student
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub name: String,
    pub cpf: String,
}

impl Entity for Student {
    const KIND: EntityKind = EntityKind::Student;

    fn to_record(&self) -> RecordResult<Record> {
        build(
            Self::KIND,
            &[(FIELD_NAME, self.name.clone()), (FIELD_CPF, self.cpf.clone())],
        )
    }

    fn from_record(record: &Record) -> RecordResult<Self> {
        expect_kind(record, Self::KIND)?;
        Ok(Self {
            name: required(record, FIELD_NAME)?,
            cpf: required(record, FIELD_CPF)?,
        })
    }
}

/// A registered teacher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Teacher {
    pub name: String,
    pub cpf: String,
}

impl Entity for Teacher {
    const KIND: EntityKind = EntityKind::Teacher;

    fn to_record(&self) -> RecordResult<Record> {
        build(
            Self::KIND,
            &[(FIELD_NAME, self.name.clone()), (FIELD_CPF, self.cpf.clone())],
        )
    }

    fn from_record(record: &Record) -> RecordResult<Self> {
        expect_kind(record, Self::KIND)?;
        Ok(Self {
            name: required(record, FIELD_NAME)?,
            cpf: required(record, FIELD_CPF)?,
        })
    }
}

/// A course (subject) offered by the school
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub name: String,
}

impl Entity for Course {
    const KIND: EntityKind = EntityKind::Course;

    fn to_record(&self) -> RecordResult<Record> {
        build(Self::KIND, &[(FIELD_NAME, self.name.clone())])
    }

    fn from_record(record: &Record) -> RecordResult<Self> {
        expect_kind(record, Self::KIND)?;
        Ok(Self {
            name: required(record, FIELD_NAME)?,
        })
    }
}

/// A class: one teacher teaching one course.
///
/// References are stored as code strings and are not checked against the
/// referenced tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub teacher: Code,
    pub course: Code,
}

impl Entity for Class {
    const KIND: EntityKind = EntityKind::Class;

    fn to_record(&self) -> RecordResult<Record> {
        build(
            Self::KIND,
            &[
                (FIELD_TEACHER_CODE, self.teacher.to_string()),
                (FIELD_COURSE_CODE, self.course.to_string()),
            ],
        )
    }

    fn from_record(record: &Record) -> RecordResult<Self> {
        expect_kind(record, Self::KIND)?;
        Ok(Self {
            teacher: required_code(record, FIELD_TEACHER_CODE)?,
            course: required_code(record, FIELD_COURSE_CODE)?,
        })
    }
}

/// A student enrolled in a class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub class: Code,
    pub student: Code,
}

impl Entity for Enrollment {
    const KIND: EntityKind = EntityKind::Enrollment;

    fn to_record(&self) -> RecordResult<Record> {
        build(
            Self::KIND,
            &[
                (FIELD_CLASS_CODE, self.class.to_string()),
                (FIELD_STUDENT_CODE, self.student.to_string()),
            ],
        )
    }

    fn from_record(record: &Record) -> RecordResult<Self> {
        expect_kind(record, Self::KIND)?;
        Ok(Self {
            class: required_code(record, FIELD_CLASS_CODE)?,
            student: required_code(record, FIELD_STUDENT_CODE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CODE_KEY;

    #[test]
    fn test_student_round_trip_through_record() {
        let student = Student {
            name: "Ana Silva".into(),
            cpf: "12345678901".into(),
        };
        let record = student.to_record().unwrap();
        assert_eq!(record.kind(), EntityKind::Student);
        assert_eq!(record.identifier(), Some("12345678901"));
        assert_eq!(Student::from_record(&record).unwrap(), student);
    }

    #[test]
    fn test_class_references_stored_as_strings() {
        let class = Class {
            teacher: Code::new(1),
            course: Code::new(3),
        };
        let record = class.to_record().unwrap();
        assert_eq!(record.get(FIELD_TEACHER_CODE), Some("1"));
        assert_eq!(record.get(FIELD_COURSE_CODE), Some("3"));
        assert_eq!(Class::from_record(&record).unwrap(), class);
    }

    #[test]
    fn test_kind_mismatch() {
        let record = Course { name: "Math".into() }.to_record().unwrap();
        assert_eq!(
            Student::from_record(&record),
            Err(RecordError::KindMismatch {
                expected: EntityKind::Student,
                actual: EntityKind::Course,
            })
        );
    }

    #[test]
    fn test_build_rejects_reserved_field() {
        let err = build(EntityKind::Course, &[(CODE_KEY, "1".to_string())]).unwrap_err();
        assert_eq!(err, RecordError::ReservedField(CODE_KEY.to_string()));
    }

    #[test]
    fn test_missing_field() {
        let record = Record::new(EntityKind::Teacher);
        let err = Teacher::from_record(&record).unwrap_err();
        assert_eq!(err.code(), "SCHOOL_MISSING_FIELD");
    }

    #[test]
    fn test_invalid_reference_code() {
        let record = Record::from_pairs(
            EntityKind::Enrollment,
            &[(FIELD_CLASS_CODE, "abc"), (FIELD_STUDENT_CODE, "1")],
        )
        .unwrap();
        let err = Enrollment::from_record(&record).unwrap_err();
        assert_eq!(err.code(), "SCHOOL_INVALID_FIELD");
    }
}
