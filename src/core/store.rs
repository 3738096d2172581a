//! The record store: an owned in-memory table mirrored to the register file
//!
//! All reads are served from memory. Every successful mutation is written
//! back to the file before the call returns; if the write fails the
//! in-memory change is undone so memory and file never disagree.

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::core::dates::DEFAULT_DISPLAY_FORMAT;
use crate::core::identity::RecordId;
use crate::core::record::{Field, Record, RecordDraft, RecordKey, RecordPatch};
use crate::core::workbook::{self, LoadedTable, WorkbookError};

/// Errors reported by store operations
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("{field} must not be empty")]
    #[diagnostic(
        code(trainreg::validation),
        help("fill in both employee and course before saving")
    )]
    Validation { field: Field },

    #[error("no record found matching '{0}'")]
    #[diagnostic(code(trainreg::lookup::not_found))]
    NotFound(String),

    #[error("{count} records match '{query}'; refusing to guess")]
    #[diagnostic(
        code(trainreg::lookup::ambiguous),
        help("address the record by its id or short reference (see `trainreg list`)")
    )]
    Ambiguous { query: String, count: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Workbook(#[from] WorkbookError),
}

/// Trim a draft and reject empty required fields
pub fn validate(draft: &RecordDraft) -> Result<RecordDraft, StoreError> {
    let employee = draft.employee.trim();
    if employee.is_empty() {
        return Err(StoreError::Validation {
            field: Field::Employee,
        });
    }
    let course = draft.course.trim();
    if course.is_empty() {
        return Err(StoreError::Validation {
            field: Field::Course,
        });
    }
    Ok(RecordDraft::new(employee, course, draft.completion_date))
}

/// In-memory table of records bound to its register file
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    records: Vec<Record>,
    date_format: String,
}

impl RecordStore {
    /// Load the register file (creating it if needed)
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with_format(path, DEFAULT_DISPLAY_FORMAT)
    }

    /// Load the register file and show spreadsheet dates with `pattern`
    ///
    /// Ids assigned to rows that had none are written back right away so
    /// they stay the same for the next process.
    pub fn open_with_format(
        path: impl Into<PathBuf>,
        pattern: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        let loaded = workbook::load_table(&path)?;
        let assigned = loaded.assigned_ids;
        let store = Self::from_loaded(path, loaded).with_date_format(pattern);

        if assigned > 0 {
            if !workbook::is_writable(&store.path) {
                warn!(
                    path = %store.path.display(),
                    "register format is read-only; assigned ids last for this run only"
                );
            } else if let Err(e) = store.save() {
                warn!(path = %store.path.display(), error = %e, "could not persist assigned ids");
            } else {
                info!(path = %store.path.display(), assigned, "wrote id column to register");
            }
        }
        Ok(store)
    }

    /// Build a store from an already-loaded table
    pub fn from_loaded(path: PathBuf, loaded: LoadedTable) -> Self {
        Self {
            path,
            records: loaded.records,
            date_format: DEFAULT_DISPLAY_FORMAT.to_string(),
        }
    }

    /// Set the pattern used to display dates inside spreadsheet files
    pub fn with_date_format(mut self, pattern: impl Into<String>) -> Self {
        self.date_format = pattern.into();
        self
    }

    /// Path of the register file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in insertion order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    fn position(&self, id: RecordId) -> Result<usize, StoreError> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Write the current table to the register file
    pub fn save(&self) -> Result<(), StoreError> {
        workbook::save_table(&self.path, &self.records, &self.date_format)?;
        Ok(())
    }

    // =====================================================================
    // Lookup
    // =====================================================================

    /// Find the single record whose content matches `key`
    ///
    /// A key without a date matches records without a date. Zero or several
    /// matches are lookup failures.
    pub fn find_by_key(&self, key: &RecordKey) -> Result<RecordId, StoreError> {
        let matches: Vec<RecordId> = self
            .records
            .iter()
            .filter(|r| r.matches_key(key))
            .map(|r| r.id)
            .collect();

        match matches.as_slice() {
            [] => Err(StoreError::NotFound(key.to_string())),
            [id] => Ok(*id),
            _ => Err(StoreError::Ambiguous {
                query: key.to_string(),
                count: matches.len(),
            }),
        }
    }

    /// Resolve a full id or a unique, case-insensitive id prefix
    pub fn find_by_id_prefix(&self, query: &str) -> Result<RecordId, StoreError> {
        let query = query.trim();
        if let Ok(id) = query.parse::<RecordId>() {
            return self.get(id).map(|r| r.id).ok_or_else(|| StoreError::NotFound(query.to_string()));
        }

        let needle = query.to_uppercase();
        if needle.is_empty() {
            return Err(StoreError::NotFound(query.to_string()));
        }
        let matches: Vec<RecordId> = self
            .records
            .iter()
            .filter(|r| r.id.to_string().starts_with(&needle))
            .map(|r| r.id)
            .collect();

        match matches.as_slice() {
            [] => Err(StoreError::NotFound(query.to_string())),
            [id] => Ok(*id),
            _ => Err(StoreError::Ambiguous {
                query: query.to_string(),
                count: matches.len(),
            }),
        }
    }

    // =====================================================================
    // Mutations
    // =====================================================================

    /// Append a new record and persist
    pub fn add(&mut self, draft: RecordDraft) -> Result<&Record, StoreError> {
        let draft = validate(&draft)?;
        let record = Record::new(draft.employee, draft.course, draft.completion_date);
        let id = record.id;

        self.records.push(record);
        if let Err(e) = self.save() {
            self.records.pop();
            return Err(e);
        }

        info!(%id, "record added");
        Ok(&self.records[self.records.len() - 1])
    }

    /// Apply a patch to the record with the given id and persist
    pub fn update(&mut self, id: RecordId, patch: &RecordPatch) -> Result<&Record, StoreError> {
        let idx = self.position(id)?;
        let draft = validate(&patch.apply_to(&self.records[idx]))?;

        let updated = Record {
            id,
            employee: draft.employee,
            course: draft.course,
            completion_date: draft.completion_date,
        };
        let previous = std::mem::replace(&mut self.records[idx], updated);
        if let Err(e) = self.save() {
            self.records[idx] = previous;
            return Err(e);
        }

        info!(%id, "record updated");
        Ok(&self.records[idx])
    }

    /// Remove the record with the given id and persist
    pub fn delete(&mut self, id: RecordId) -> Result<Record, StoreError> {
        let idx = self.position(id)?;
        let removed = self.records.remove(idx);
        if let Err(e) = self.save() {
            self.records.insert(idx, removed);
            return Err(e);
        }

        info!(%id, "record deleted");
        Ok(removed)
    }

    /// Update the single record matching `key`
    pub fn update_matching(
        &mut self,
        key: &RecordKey,
        patch: &RecordPatch,
    ) -> Result<&Record, StoreError> {
        let id = self.find_by_key(key)?;
        self.update(id, patch)
    }

    /// Delete the single record matching `key`
    pub fn delete_matching(&mut self, key: &RecordKey) -> Result<Record, StoreError> {
        let id = self.find_by_key(key)?;
        self.delete(id)
    }
}
