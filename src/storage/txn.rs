//! Write transactions
//! ------------------
//! A `CatalogTxn` works on a private staged copy of the catalog state. The
//! store publishes the staged copy only when the closure driving the
//! transaction returns `Ok` and the snapshot (if enabled) was written;
//! otherwise the staged copy is dropped and readers never observe it.

use super::state::CatalogState;
use crate::catalog::{ColumnCatalogRecord, ColumnCatalogView, ColumnId, TableCatalogRecord, TableCatalogView, TableId};
use crate::error::{CatalogError, CatalogResult};

pub struct CatalogTxn<'a> {
    pub(crate) state: &'a mut CatalogState,
    pub(crate) max_identifier_len: usize,
}

impl<'a> CatalogTxn<'a> {
    /// Persist a transient entry and return its new identity.
    pub fn insert_table(&mut self, record: TableCatalogRecord) -> CatalogResult<TableId> {
        self.state.insert(record, self.max_identifier_len)
    }

    pub fn attach_column(&mut self, table: TableId, column: ColumnCatalogRecord) -> CatalogResult<ColumnId> {
        self.state.attach(table, column, self.max_identifier_len)
    }

    /// Remove a column by name and return its final view.
    pub fn detach_column(&mut self, table: TableId, column: &str) -> CatalogResult<ColumnCatalogView> {
        self.state.detach(table, column)?.as_immutable_view()
    }

    pub fn rename_table(&mut self, table: TableId, new_name: &str) -> CatalogResult<()> {
        self.state.rename(table, new_name, self.max_identifier_len)
    }

    pub fn set_identifier_column(&mut self, table: TableId, column: &str) -> CatalogResult<()> {
        self.state.set_identifier_column(table, column, self.max_identifier_len)
    }

    /// Cascading delete; returns the number of column entries removed.
    pub fn delete_table(&mut self, table: TableId) -> CatalogResult<usize> {
        self.state.delete(table)
    }

    /// Read-only access to the staged record.
    pub fn record(&self, table: TableId) -> Option<&TableCatalogRecord> { self.state.tables.get(&table) }

    pub fn table_id(&self, name: &str) -> Option<TableId> { self.state.names.get(name).copied() }

    /// View of the staged (uncommitted) state of a table.
    pub fn view(&self, table: TableId) -> CatalogResult<TableCatalogView> {
        self.record(table)
            .ok_or_else(|| CatalogError::not_found(format!("table {}", table)))?
            .as_immutable_view()
    }
}
