//! Table: the partition of the document for one entity kind
//!
//! Persisted as one JSON object:
//!
//! ```text
//! {
//!   "CPFS": ["12345678901"],       uniqueness registry
//!   "SEQ": 3,                      last issued code (monotonic allocation only)
//!   "1": { ...record... },
//!   "3": { ...record... }
//! }
//! ```
//!
//! Reserved keys are never record codes. Records keep insertion order.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::registry::UniquenessRegistry;
use crate::record::{Code, Record};

/// Reserved key holding the uniqueness registry
pub const REGISTRY_KEY: &str = "CPFS";
/// Reserved key holding the last issued code
pub const SEQUENCE_KEY: &str = "SEQ";

/// Records of one entity kind plus the table's reserved entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    registry: Option<UniquenessRegistry>,
    sequence: Option<Code>,
    records: IndexMap<Code, Record>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> Option<&UniquenessRegistry> {
        self.registry.as_ref()
    }

    pub fn registry_mut(&mut self) -> Option<&mut UniquenessRegistry> {
        self.registry.as_mut()
    }

    /// Returns the registry, creating an empty one if absent.
    pub fn ensure_registry(&mut self) -> &mut UniquenessRegistry {
        self.registry.get_or_insert_with(UniquenessRegistry::new)
    }

    /// Last code issued by monotonic allocation
    pub fn sequence(&self) -> Option<Code> {
        self.sequence
    }

    pub(crate) fn set_sequence(&mut self, code: Code) {
        self.sequence = Some(code);
    }

    /// Number of entries as stored: records plus reserved keys present.
    pub fn entry_count(&self) -> usize {
        self.records.len()
            + usize::from(self.registry.is_some())
            + usize::from(self.sequence.is_some())
    }

    /// Number of records, reserved keys excluded
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, code: Code) -> bool {
        self.records.contains_key(&code)
    }

    pub fn get(&self, code: Code) -> Option<&Record> {
        self.records.get(&code)
    }

    pub fn get_mut(&mut self, code: Code) -> Option<&mut Record> {
        self.records.get_mut(&code)
    }

    /// Highest live record code
    pub fn max_code(&self) -> Option<Code> {
        self.records.keys().copied().max()
    }

    /// Stores `record` under `code`, stamping the code onto the record.
    pub fn insert(&mut self, code: Code, mut record: Record) -> Option<Record> {
        record.assign_code(code);
        self.records.insert(code, record)
    }

    /// Removes the record at `code`, preserving the order of the rest.
    pub fn remove(&mut self, code: Code) -> Option<Record> {
        self.records.shift_remove(&code)
    }

    /// Records in storage order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// `(code, record)` pairs in storage order
    pub fn iter(&self) -> impl Iterator<Item = (Code, &Record)> {
        self.records.iter().map(|(code, record)| (*code, record))
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entry_count()))?;
        if let Some(registry) = &self.registry {
            map.serialize_entry(REGISTRY_KEY, registry)?;
        }
        if let Some(sequence) = &self.sequence {
            map.serialize_entry(SEQUENCE_KEY, sequence)?;
        }
        for (code, record) in &self.records {
            map.serialize_entry(&code.to_string(), record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Table {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TableVisitor)
    }
}

struct TableVisitor;

impl<'de> Visitor<'de> for TableVisitor {
    type Value = Table;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a table object keyed by record code")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Table, A::Error> {
        let mut table = Table::new();

        while let Some(key) = access.next_key::<String>()? {
            match key.as_str() {
                REGISTRY_KEY => table.registry = Some(access.next_value()?),
                SEQUENCE_KEY => table.sequence = Some(access.next_value()?),
                _ => {
                    // Keys must be canonical decimals so " 1" or "01" cannot alias "1"
                    let code: Code = key
                        .parse()
                        .ok()
                        .filter(|code: &Code| code.to_string() == key)
                        .ok_or_else(|| {
                            de::Error::custom(format!("unexpected table key {:?}", key))
                        })?;
                    let record: Record = access.next_value()?;
                    if let Some(stored) = record.code() {
                        if stored != code {
                            return Err(de::Error::custom(format!(
                                "record under key {} carries codigo {}",
                                code, stored
                            )));
                        }
                    }
                    // Duplicate keys: last wins
                    table.insert(code, record);
                }
            }
        }

        Ok(table)
    }
}
