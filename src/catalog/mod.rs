//! In-memory live catalog
//!
//! Holds the current table descriptors of the source catalog, keyed
//! case-insensitively by `(database, table)`. Query-mode events re-fetch the
//! renamed table from here.

pub mod known;

pub use known::{KnownChange, KnownObjectCache, PendingKnownChanges};

use crate::collaborators::LiveCatalog;
use crate::error::{SyncError, SyncResult};
use crate::source::TableDescriptor;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct TableCatalog {
    tables: BTreeMap<(String, String), TableDescriptor>,
}

impl TableCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a table; returns the previous descriptor
    pub fn upsert(&mut self, table: TableDescriptor) -> Option<TableDescriptor> {
        self.tables.insert(table.key(), table)
    }

    pub fn get(&self, database: &str, name: &str) -> Option<&TableDescriptor> {
        self.tables
            .get(&(database.to_lowercase(), name.to_lowercase()))
    }

    pub fn remove(&mut self, database: &str, name: &str) -> Option<TableDescriptor> {
        self.tables
            .remove(&(database.to_lowercase(), name.to_lowercase()))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableDescriptor> {
        self.tables.values()
    }
}

impl FromIterator<TableDescriptor> for TableCatalog {
    fn from_iter<I: IntoIterator<Item = TableDescriptor>>(iter: I) -> Self {
        let mut catalog = TableCatalog::new();
        for table in iter {
            catalog.upsert(table);
        }
        catalog
    }
}

impl LiveCatalog for TableCatalog {
    fn lookup_table(&self, database: &str, name: &str) -> SyncResult<TableDescriptor> {
        self.get(database, name)
            .cloned()
            .ok_or_else(|| SyncError::not_found(database, name))
    }
}
