//! The whole persisted state: one JSON object keyed by table name.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::errors::{StoreError, StoreResult};
use crate::record::EntityKind;
use crate::table::Table;

/// Every table of the store, in storage order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    tables: IndexMap<String, Table>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a persisted document.
    ///
    /// `origin` names the source in error messages.
    pub fn from_json_str(text: &str, origin: &str) -> StoreResult<Self> {
        let document: Document =
            serde_json::from_str(text).map_err(|e| StoreError::parse(origin, e.to_string()))?;
        document
            .check_consistency()
            .map_err(|reason| StoreError::parse(origin, reason))?;
        Ok(document)
    }

    /// Serializes with two-space indentation.
    pub fn to_json_string(&self) -> StoreResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Serialize(e.to_string()))
    }

    pub fn table(&self, kind: EntityKind) -> Option<&Table> {
        self.tables.get(kind.table_name())
    }

    pub fn table_mut(&mut self, kind: EntityKind) -> Option<&mut Table> {
        self.tables.get_mut(kind.table_name())
    }

    /// Returns the table for `kind`, creating an empty one if absent.
    pub fn ensure_table(&mut self, kind: EntityKind) -> &mut Table {
        self.tables.entry(kind.table_name().to_string()).or_default()
    }

    /// Table names in storage order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Every record must sit in the table named by its own `table_name`.
    fn check_consistency(&self) -> Result<(), String> {
        for (name, table) in &self.tables {
            for (code, record) in table.iter() {
                if record.kind().table_name() != name {
                    return Err(format!(
                        "record {} in table {:?} is tagged {:?}",
                        code,
                        name,
                        record.kind().table_name()
                    ));
                }
            }
        }
        Ok(())
    }
}
