//! Record model
//!
//! Records are the unit of storage. Two views exist:
//!
//! - [`Record`]: the dynamic field map the document persists
//! - [`Entity`] implementors: one typed struct per entity kind
//!
//! The store operates on [`Record`]; typed callers convert through [`Entity`].

mod entity;
mod errors;
mod kind;
#[allow(clippy::module_inception)]
mod record;

pub use entity::{Class, Course, Enrollment, Entity, Student, Teacher};
pub use errors::{RecordError, RecordResult};
pub use kind::{
    Code, EntityKind, CODE_KEY, FIELD_CLASS_CODE, FIELD_COURSE_CODE, FIELD_CPF, FIELD_NAME,
    FIELD_STUDENT_CODE, FIELD_TEACHER_CODE, KIND_KEY,
};
pub use record::{is_reserved, FieldValue, Fields, Record};
