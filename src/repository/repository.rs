//! CRUD operations over the document store
//!
//! Every operation is one cycle:
//!
//! 1. Acquire the store lock
//! 2. Load the full document
//! 3. Read or mutate one table
//! 4. Save the full document (mutations only, and only on success)
//!
//! No state survives between calls. A rejected or failed mutation performs
//! no write.

use std::path::PathBuf;

use super::errors::{RepositoryError, RepositoryResult};
use super::options::{RepositoryOptions, UnknownFieldPolicy};
use crate::document::{Document, DocumentBackend, JsonFileBackend, NoLock, StoreLock};
use crate::observability::Logger;
use crate::record::{is_reserved, Code, Entity, EntityKind, Fields, Record};
use crate::table::Table;

/// Result of a successful update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub code: Code,
    /// Field names the stored record did not carry before the update
    pub unknown_fields: Vec<String>,
}

/// Record store backed by a single document
#[derive(Debug)]
pub struct Repository {
    backend: Box<dyn DocumentBackend>,
    lock: Box<dyn StoreLock>,
    options: RepositoryOptions,
}

impl Repository {
    /// Creates a repository with no locking and default options.
    pub fn new(backend: impl DocumentBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            lock: Box::new(NoLock),
            options: RepositoryOptions::default(),
        }
    }

    /// Repository over a JSON file at `path`
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self::new(JsonFileBackend::new(path))
    }

    /// Installs the lock held across each operation.
    pub fn with_lock(mut self, lock: impl StoreLock + 'static) -> Self {
        self.lock = Box::new(lock);
        self
    }

    pub fn with_options(mut self, options: RepositoryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> RepositoryOptions {
        self.options
    }

    pub fn backend(&self) -> &dyn DocumentBackend {
        self.backend.as_ref()
    }

    // -------------------------------------------------------------------
    // Operation cycle
    // -------------------------------------------------------------------

    fn load(&self) -> RepositoryResult<Document> {
        self.backend.load().map_err(|e| {
            let location = self.backend.location();
            let reason = e.to_string();
            Logger::error(
                "DOCUMENT_LOAD_FAILED",
                &[
                    ("code", e.code()),
                    ("location", location.as_str()),
                    ("reason", reason.as_str()),
                ],
            );
            RepositoryError::from(e)
        })
    }

    fn read<T>(&self, op: impl FnOnce(&Document) -> RepositoryResult<T>) -> RepositoryResult<T> {
        let _guard = self.lock.acquire()?;
        let document = self.load()?;
        op(&document)
    }

    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut Document) -> RepositoryResult<T>,
    ) -> RepositoryResult<T> {
        let _guard = self.lock.acquire()?;
        let mut document = self.load()?;
        let value = op(&mut document)?;
        self.backend.save(&document)?;
        Ok(value)
    }

    /// Loads the whole document.
    pub fn snapshot(&self) -> RepositoryResult<Document> {
        self.read(|document| Ok(document.clone()))
    }

    // -------------------------------------------------------------------
    // CRUD
    // -------------------------------------------------------------------

    /// Stores a new record and returns its assigned code.
    ///
    /// Rejected with `DuplicateIdentifier`, without writing, when the
    /// record's identifier is already registered in its table.
    pub fn insert(&self, record: Record) -> RepositoryResult<Code> {
        let kind = record.kind();
        let allocation = self.options.allocation;

        let code = self.mutate(move |document| {
            let table = document.ensure_table(kind);
            let registry = table.ensure_registry();

            if let Some(identifier) = record.identifier() {
                if !registry.register(identifier) {
                    Logger::info(
                        "DUPLICATE_IDENTIFIER",
                        &[("identifier", identifier), ("table", kind.table_name())],
                    );
                    return Err(RepositoryError::DuplicateIdentifier {
                        table: kind,
                        identifier: identifier.to_string(),
                    });
                }
            }

            let code = allocation
                .allocate(table)
                .ok_or(RepositoryError::CodeSpaceExhausted(kind))?;
            table.insert(code, record);
            Ok(code)
        })?;

        Logger::info(
            "RECORD_INSERTED",
            &[("code", code.to_string().as_str()), ("table", kind.table_name())],
        );
        Ok(code)
    }

    /// Overwrites fields of the record at `code`.
    ///
    /// `table_name` and `codigo` are never overwritten. Field names the record
    /// did not carry are handled per [`UnknownFieldPolicy`]. Changing the
    /// identifier moves its registry entry and is rejected if another record
    /// already owns the new value.
    pub fn update(
        &self,
        kind: EntityKind,
        code: Code,
        fields: &Fields,
    ) -> RepositoryResult<UpdateOutcome> {
        let policy = self.options.unknown_fields;

        let outcome = self.mutate(|document| {
            let table = document
                .table_mut(kind)
                .ok_or(RepositoryError::TableNotFound(kind))?;

            let (unknown_fields, old_identifier) = {
                let record = table.get(code).ok_or_else(|| not_found(kind, code))?;
                let unknown: Vec<String> = fields
                    .keys()
                    .filter(|name| !is_reserved(name) && !record.has_field(name))
                    .cloned()
                    .collect();
                (unknown, record.identifier().map(str::to_string))
            };

            if let (UnknownFieldPolicy::Reject, Some(field)) = (policy, unknown_fields.first()) {
                return Err(RepositoryError::UnknownField {
                    table: kind,
                    code,
                    field: field.clone(),
                });
            }

            let new_identifier = kind
                .identifier_field()
                .and_then(|field| fields.get(field))
                .cloned();
            if let Some(new_identifier) = new_identifier {
                move_identifier(table, kind, old_identifier, new_identifier)?;
            }

            let record = table.get_mut(code).ok_or_else(|| not_found(kind, code))?;
            for (name, value) in fields {
                if is_reserved(name) {
                    continue;
                }
                record.set(name.clone(), value.clone())?;
            }

            Ok(UpdateOutcome {
                code,
                unknown_fields,
            })
        })?;

        let code_str = code.to_string();
        for field in &outcome.unknown_fields {
            Logger::warn(
                "UNKNOWN_FIELD",
                &[
                    ("code", code_str.as_str()),
                    ("field", field.as_str()),
                    ("table", kind.table_name()),
                ],
            );
        }
        Logger::info(
            "RECORD_UPDATED",
            &[("code", code_str.as_str()), ("table", kind.table_name())],
        );
        Ok(outcome)
    }

    /// Removes the record at `code` and releases its identifier.
    ///
    /// Returns the removed record.
    pub fn delete(&self, kind: EntityKind, code: Code) -> RepositoryResult<Record> {
        let record = self.mutate(|document| {
            let table = document
                .table_mut(kind)
                .ok_or_else(|| not_found(kind, code))?;
            let record = table.remove(code).ok_or_else(|| not_found(kind, code))?;

            if let (Some(identifier), Some(registry)) =
                (record.identifier(), table.registry_mut())
            {
                registry.release(identifier);
            }
            Ok(record)
        })?;

        Logger::info(
            "RECORD_DELETED",
            &[("code", code.to_string().as_str()), ("table", kind.table_name())],
        );
        Ok(record)
    }

    /// Records of `kind` in storage order; empty if the table does not exist.
    pub fn list(&self, kind: EntityKind) -> RepositoryResult<Vec<Record>> {
        self.read(|document| {
            Ok(document
                .table(kind)
                .map(|table| table.records().cloned().collect())
                .unwrap_or_default())
        })
    }

    /// The record at `code`.
    pub fn get(&self, kind: EntityKind, code: Code) -> RepositoryResult<Record> {
        self.read(|document| {
            document
                .table(kind)
                .and_then(|table| table.get(code))
                .cloned()
                .ok_or_else(|| not_found(kind, code))
        })
    }

    /// The raw table for `kind`, registry included.
    pub fn load_table(&self, kind: EntityKind) -> RepositoryResult<Option<Table>> {
        self.read(|document| Ok(document.table(kind).cloned()))
    }

    // -------------------------------------------------------------------
    // Typed access
    // -------------------------------------------------------------------

    pub fn insert_entity<E: Entity>(&self, entity: &E) -> RepositoryResult<Code> {
        self.insert(entity.to_record()?)
    }

    pub fn update_entity<E: Entity>(
        &self,
        code: Code,
        entity: &E,
    ) -> RepositoryResult<UpdateOutcome> {
        self.update(E::KIND, code, entity.to_record()?.fields())
    }

    pub fn get_as<E: Entity>(&self, code: Code) -> RepositoryResult<E> {
        let record = self.get(E::KIND, code)?;
        Ok(E::from_record(&record)?)
    }

    pub fn list_as<E: Entity>(&self) -> RepositoryResult<Vec<(Code, E)>> {
        self.list(E::KIND)?
            .iter()
            .filter_map(|record| record.code().map(|code| (code, record)))
            .map(|(code, record)| Ok((code, E::from_record(record)?)))
            .collect()
    }
}

fn not_found(kind: EntityKind, code: Code) -> RepositoryError {
    Logger::info(
        "RECORD_NOT_FOUND",
        &[("code", code.to_string().as_str()), ("table", kind.table_name())],
    );
    RepositoryError::NotFound { table: kind, code }
}

/// Swaps a record's identifier in the table's registry.
fn move_identifier(
    table: &mut Table,
    kind: EntityKind,
    old: Option<String>,
    new: Option<String>,
) -> RepositoryResult<()> {
    if old == new {
        return Ok(());
    }
    let registry = table.ensure_registry();
    if let Some(value) = new.as_deref() {
        if registry.contains(value) {
            Logger::info(
                "DUPLICATE_IDENTIFIER",
                &[("identifier", value), ("table", kind.table_name())],
            );
            return Err(RepositoryError::DuplicateIdentifier {
                table: kind,
                identifier: value.to_string(),
            });
        }
    }
    if let Some(value) = old.as_deref() {
        registry.release(value);
    }
    if let Some(value) = new.as_deref() {
        registry.register(value);
    }
    Ok(())
}
