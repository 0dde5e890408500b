//! Dynamic record representation
//!
//! A record is the persisted form of one entity instance:
//!
//! ```text
//! { "table_name": "alunos", "codigo": 1, "nome": "Ana Silva", "cpf": "12345678901" }
//! ```
//!
//! Field values are strings, or null while unset. `table_name` and `codigo`
//! are owned by the store and never live in the field map.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::errors::{RecordError, RecordResult};
use super::kind::{Code, EntityKind, CODE_KEY, KIND_KEY};

/// A field value: a string, or `None` while unset
pub type FieldValue = Option<String>;

/// Ordered field name -> value mapping
pub type Fields = IndexMap<String, FieldValue>;

/// One entity instance plus its assigned code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    kind: EntityKind,
    code: Option<Code>,
    fields: Fields,
}

impl Record {
    /// Creates an unsaved record with every field of `kind` unset.
    pub fn new(kind: EntityKind) -> Self {
        let fields = kind
            .field_names()
            .iter()
            .map(|name| (name.to_string(), None))
            .collect();
        Self {
            kind,
            code: None,
            fields,
        }
    }

    /// Creates an unsaved record from `(field, value)` pairs.
    pub fn from_pairs(kind: EntityKind, pairs: &[(&str, &str)]) -> RecordResult<Self> {
        let mut record = Self::new(kind);
        for (name, value) in pairs {
            record.set(*name, Some(value.to_string()))?;
        }
        Ok(record)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Code assigned at insert time, `None` before the record is stored
    pub fn code(&self) -> Option<Code> {
        self.code
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Returns the value of a set field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|value| value.as_deref())
    }

    /// Whether the record carries `name`, set or not
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Sets a field, returning the previous value if the field existed.
    ///
    /// Names outside the kind's field list are accepted; the store keeps
    /// whatever the caller writes.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: FieldValue,
    ) -> RecordResult<Option<FieldValue>> {
        let name = name.into();
        if is_reserved(&name) {
            return Err(RecordError::ReservedField(name));
        }
        Ok(self.fields.insert(name, value))
    }

    /// Value of the kind's identifier field, if the kind has one and it is set
    pub fn identifier(&self) -> Option<&str> {
        self.kind.identifier_field().and_then(|field| self.get(field))
    }

    pub(crate) fn assign_code(&mut self, code: Code) {
        self.code = Some(code);
    }

    /// Renders the record as a JSON object in persisted form.
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        map.insert(KIND_KEY.to_string(), Value::from(self.kind.table_name()));
        map.insert(
            CODE_KEY.to_string(),
            self.code.map_or(Value::Null, |code| Value::from(code.value())),
        );
        for (name, value) in &self.fields {
            map.insert(
                name.clone(),
                value.as_ref().map_or(Value::Null, |v| Value::from(v.as_str())),
            );
        }
        Value::Object(map)
    }
}

/// Whether `name` is managed by the store
pub fn is_reserved(name: &str) -> bool {
    name == CODE_KEY || name == KIND_KEY
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 2))?;
        map.serialize_entry(KIND_KEY, self.kind.table_name())?;
        map.serialize_entry(CODE_KEY, &self.code)?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a record object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
        let mut kind = None;
        let mut code = None;
        let mut fields = Fields::new();

        while let Some(key) = access.next_key::<String>()? {
            match key.as_str() {
                KIND_KEY => {
                    let name: String = access.next_value()?;
                    let parsed = EntityKind::from_table_name(&name).ok_or_else(|| {
                        de::Error::custom(format!("unknown table_name {:?}", name))
                    })?;
                    kind = Some(parsed);
                }
                CODE_KEY => {
                    code = access.next_value::<Option<Code>>()?;
                }
                _ => {
                    let value: FieldValue = access.next_value().map_err(|_| {
                        de::Error::custom(format!(
                            "field {:?} must be a string or null",
                            key
                        ))
                    })?;
                    fields.insert(key, value);
                }
            }
        }

        let kind = kind.ok_or_else(|| de::Error::missing_field(KIND_KEY))?;
        Ok(Record { kind, code, fields })
    }
}
