//! Table catalog entries
//! ---------------------
//! `TableCatalogRecord` is the authoritative, mutable row for one table, view or
//! materialized view. It owns its column entries exclusively and in attachment
//! order. Records are only ever mutated inside a catalog store transaction;
//! everything handed to readers is a `TableCatalogView`, a deep copy that holds
//! no reference back into the store.
//!
//! A record is Transient until the store inserts it and assigns its identity,
//! and Persisted afterwards. The transition happens exactly once.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::column::{ColumnCatalogRecord, ColumnCatalogView};
use super::{ColumnId, TableId, TableKind};
use crate::error::{CatalogError, CatalogResult};
use crate::ident::{self, DEFAULT_IDENTIFIER_COLUMN};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCatalogRecord {
    pub(crate) id: Option<TableId>,
    pub(crate) name: String,
    storage_location: String,
    pub(crate) identifier_column: String,
    table_kind: TableKind,
    pub(crate) columns: Vec<ColumnCatalogRecord>,
}

impl TableCatalogRecord {
    /// A transient entry with the default identifier column and no columns.
    ///
    /// `storage_location` may be empty when the table has no backing file yet.
    pub fn new(name: impl Into<String>, storage_location: impl Into<String>, table_kind: TableKind) -> Self {
        Self {
            id: None,
            name: name.into(),
            storage_location: storage_location.into(),
            identifier_column: DEFAULT_IDENTIFIER_COLUMN.to_string(),
            table_kind,
            columns: Vec::new(),
        }
    }

    pub fn with_identifier_column(mut self, column: impl Into<String>) -> Self {
        self.identifier_column = column.into();
        self
    }

    /// Stage a column to be persisted together with this entry on insert.
    /// Only valid while the entry is still transient.
    pub fn with_column(mut self, column: ColumnCatalogRecord) -> Self {
        self.columns.push(column);
        self
    }

    pub fn id(&self) -> Option<TableId> { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn storage_location(&self) -> &str { &self.storage_location }
    pub fn identifier_column(&self) -> &str { &self.identifier_column }
    pub fn table_kind(&self) -> TableKind { self.table_kind }
    pub fn columns(&self) -> &[ColumnCatalogRecord] { &self.columns }
    pub fn is_persisted(&self) -> bool { self.id.is_some() }

    pub fn column(&self, name: &str) -> Option<&ColumnCatalogRecord> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub(crate) fn validate(&self, max_len: usize) -> CatalogResult<()> {
        ident::check_name("table name", &self.name, max_len)?;
        ident::check_len("storage location", &self.storage_location, max_len)?;
        ident::check_name("identifier column", &self.identifier_column, max_len)?;
        let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();
        for c in &self.columns {
            c.validate(max_len)?;
            if !seen.insert(c.name()) {
                return Err(CatalogError::duplicate_column(self.name.as_str(), c.name()));
            }
        }
        Ok(())
    }

    /// Append an already-identified column, taking ownership of it.
    pub(crate) fn push_column(&mut self, mut column: ColumnCatalogRecord, column_id: ColumnId) -> CatalogResult<ColumnId> {
        let table_id = self.id.ok_or_else(|| CatalogError::unresolved(format!("table '{}'", self.name)))?;
        if self.columns.iter().any(|c| c.id() == Some(column_id)) {
            return Err(CatalogError::internal(format!("column id {} attached twice", column_id)));
        }
        if self.column(column.name()).is_some() {
            return Err(CatalogError::duplicate_column(self.name.as_str(), column.name()));
        }
        column.id = Some(column_id);
        column.table_id = Some(table_id);
        self.columns.push(column);
        Ok(column_id)
    }

    /// Remove a column by name, keeping the order of the remaining columns.
    pub(crate) fn remove_column(&mut self, name: &str) -> Option<ColumnCatalogRecord> {
        let pos = self.columns.iter().position(|c| c.name() == name)?;
        Some(self.columns.remove(pos))
    }

    /// Export a detached view of this entry and all of its columns, in order.
    ///
    /// Fails with `UnresolvedReference` while the entry is transient: a view
    /// without identity cannot be correlated with other catalog records.
    pub fn as_immutable_view(&self) -> CatalogResult<TableCatalogView> {
        let id = self.id.ok_or_else(|| CatalogError::unresolved(format!("table '{}'", self.name)))?;
        let columns = self
            .columns
            .iter()
            .map(|c| c.as_immutable_view())
            .collect::<CatalogResult<Vec<_>>>()?;
        Ok(TableCatalogView {
            id,
            name: self.name.clone(),
            storage_location: self.storage_location.clone(),
            identifier_column: self.identifier_column.clone(),
            table_kind: self.table_kind,
            columns: Arc::from(columns),
        })
    }
}

/// Immutable snapshot of a table entry. Cheap to clone and safe to share
/// across threads; it cannot be used to mutate catalog state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCatalogView {
    id: TableId,
    name: String,
    storage_location: String,
    identifier_column: String,
    table_kind: TableKind,
    columns: Arc<[ColumnCatalogView]>,
}

impl TableCatalogView {
    pub fn id(&self) -> TableId { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn storage_location(&self) -> &str { &self.storage_location }
    pub fn identifier_column(&self) -> &str { &self.identifier_column }
    pub fn table_kind(&self) -> TableKind { self.table_kind }
    pub fn columns(&self) -> &[ColumnCatalogView] { &self.columns }

    pub fn column(&self, name: &str) -> Option<&ColumnCatalogView> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_names(&self) -> Vec<&str> { self.columns.iter().map(|c| c.name()).collect() }

    /// Position of the identifier column in the column list, if it is attached.
    pub fn identifier_position(&self) -> Option<usize> {
        self.columns.iter().position(|c| c.name() == self.identifier_column)
    }

    pub fn to_json(&self) -> CatalogResult<serde_json::Value> { Ok(serde_json::to_value(self)?) }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod table_tests;
