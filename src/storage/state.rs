use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::catalog::{ColumnCatalogRecord, ColumnId, TableCatalogRecord, TableId};
use crate::error::{CatalogError, CatalogResult};
use crate::ident;

/// In-memory catalog state owned by a `CatalogStore`.
///
/// `tables` is authoritative. `names` and `column_owners` are indexes kept in
/// step with it by every mutation below. Allocators hold the last identity
/// handed out and only ever grow.
#[derive(Debug, Clone, Default)]
pub(crate) struct CatalogState {
    pub(crate) tables: BTreeMap<TableId, TableCatalogRecord>,
    pub(crate) names: HashMap<String, TableId>,
    pub(crate) column_owners: HashMap<ColumnId, TableId>,
    pub(crate) last_table_id: u64,
    pub(crate) last_column_id: u64,
}

impl CatalogState {
    /// Rebuild indexes from persisted records. Column ownership is taken from
    /// each column's back-reference so inconsistencies surface on delete.
    pub(crate) fn from_records(tables: Vec<TableCatalogRecord>, last_table_id: u64, last_column_id: u64) -> CatalogResult<Self> {
        let mut st = CatalogState { last_table_id, last_column_id, ..Default::default() };
        for t in tables {
            let id = t.id().ok_or_else(|| CatalogError::Serialization { message: format!("snapshot table '{}' has no identity", t.name()) })?;
            if st.names.insert(t.name().to_string(), id).is_some() {
                return Err(CatalogError::Serialization { message: format!("snapshot has duplicate table name '{}'", t.name()) });
            }
            for c in t.columns() {
                let cid = c.id().ok_or_else(|| CatalogError::Serialization { message: format!("snapshot column '{}.{}' has no identity", t.name(), c.name()) })?;
                let owner = c.table_id().ok_or_else(|| CatalogError::Serialization { message: format!("snapshot column '{}.{}' has no owning table", t.name(), c.name()) })?;
                if st.column_owners.insert(cid, owner).is_some() {
                    return Err(CatalogError::Serialization { message: format!("snapshot has duplicate column id {}", cid) });
                }
                st.last_column_id = st.last_column_id.max(cid.0);
            }
            st.last_table_id = st.last_table_id.max(id.0);
            if st.tables.insert(id, t).is_some() {
                return Err(CatalogError::Serialization { message: format!("snapshot has duplicate table id {}", id) });
            }
        }
        Ok(st)
    }

    /// Empty state that keeps the identity allocators.
    pub(crate) fn cleared(&self) -> Self {
        CatalogState { last_table_id: self.last_table_id, last_column_id: self.last_column_id, ..Default::default() }
    }

    fn alloc_table_id(&mut self) -> TableId {
        self.last_table_id += 1;
        TableId(self.last_table_id)
    }

    fn alloc_column_id(&mut self) -> ColumnId {
        self.last_column_id += 1;
        ColumnId(self.last_column_id)
    }

    fn table_mut(&mut self, id: TableId) -> CatalogResult<&mut TableCatalogRecord> {
        self.tables.get_mut(&id).ok_or_else(|| CatalogError::not_found(format!("table {}", id)))
    }

    pub(crate) fn insert(&mut self, mut record: TableCatalogRecord, max_len: usize) -> CatalogResult<TableId> {
        if let Some(id) = record.id() {
            return Err(CatalogError::invalid(format!("table '{}' is already persisted as {}", record.name(), id)));
        }
        record.validate(max_len)?;
        if let Some(c) = record.columns().iter().find(|c| c.is_persisted()) {
            return Err(CatalogError::invalid(format!("column '{}' is already attached to another table", c.name())));
        }
        if self.names.contains_key(record.name()) {
            return Err(CatalogError::duplicate_table(record.name()));
        }
        let id = self.alloc_table_id();
        record.id = Some(id);
        let staged = std::mem::take(&mut record.columns);
        for column in staged {
            let cid = self.alloc_column_id();
            record.push_column(column, cid)?;
            self.column_owners.insert(cid, id);
        }
        debug!(target: "tablecatalog::storage", "insert: table='{}' id={} kind={} columns={}", record.name(), id, record.table_kind(), record.columns().len());
        self.names.insert(record.name().to_string(), id);
        self.tables.insert(id, record);
        Ok(id)
    }

    pub(crate) fn attach(&mut self, table: TableId, column: ColumnCatalogRecord, max_len: usize) -> CatalogResult<ColumnId> {
        column.validate(max_len)?;
        if column.is_persisted() {
            return Err(CatalogError::invalid(format!("column '{}' is already attached to another table", column.name())));
        }
        {
            let t = self.tables.get(&table).ok_or_else(|| CatalogError::not_found(format!("table {}", table)))?;
            if t.column(column.name()).is_some() {
                return Err(CatalogError::duplicate_column(t.name(), column.name()));
            }
        }
        let cid = self.alloc_column_id();
        let name = column.name().to_string();
        self.table_mut(table)?.push_column(column, cid)?;
        self.column_owners.insert(cid, table);
        debug!(target: "tablecatalog::storage", "attach: table={} column='{}' id={}", table, name, cid);
        Ok(cid)
    }

    pub(crate) fn detach(&mut self, table: TableId, column: &str) -> CatalogResult<ColumnCatalogRecord> {
        let t = self.table_mut(table)?;
        let tname = t.name().to_string();
        let removed = t
            .remove_column(column)
            .ok_or_else(|| CatalogError::not_found(format!("column '{}' in table '{}'", column, tname)))?;
        if let Some(cid) = removed.id() {
            self.column_owners.remove(&cid);
        }
        debug!(target: "tablecatalog::storage", "detach: table='{}' column='{}'", tname, column);
        Ok(removed)
    }

    pub(crate) fn rename(&mut self, table: TableId, new_name: &str, max_len: usize) -> CatalogResult<()> {
        ident::check_name("table name", new_name, max_len)?;
        let old = self.tables.get(&table).ok_or_else(|| CatalogError::not_found(format!("table {}", table)))?.name().to_string();
        if old == new_name {
            return Ok(());
        }
        if self.names.contains_key(new_name) {
            return Err(CatalogError::duplicate_table(new_name));
        }
        self.table_mut(table)?.name = new_name.to_string();
        self.names.remove(&old);
        self.names.insert(new_name.to_string(), table);
        debug!(target: "tablecatalog::storage", "rename: table={} '{}' -> '{}'", table, old, new_name);
        Ok(())
    }

    pub(crate) fn set_identifier_column(&mut self, table: TableId, column: &str, max_len: usize) -> CatalogResult<()> {
        ident::check_name("identifier column", column, max_len)?;
        self.table_mut(table)?.identifier_column = column.to_string();
        Ok(())
    }

    /// Delete a table and every column it owns. All ownership checks run
    /// before anything is removed, so a failure leaves the state untouched.
    pub(crate) fn delete(&mut self, table: TableId) -> CatalogResult<usize> {
        let t = self.tables.get(&table).ok_or_else(|| CatalogError::not_found(format!("table {}", table)))?;
        for c in t.columns() {
            let cid = c.id().ok_or_else(|| CatalogError::cascade(table.0, format!("column '{}' has no identity", c.name())))?;
            if c.table_id() != Some(table) {
                return Err(CatalogError::cascade(table.0, format!(
                    "column '{}' ({}) is owned by table {:?}", c.name(), cid, c.table_id().map(|t| t.0)
                )));
            }
            match self.column_owners.get(&cid) {
                Some(owner) if *owner == table => {}
                other => {
                    return Err(CatalogError::cascade(table.0, format!(
                        "column '{}' ({}) is indexed under table {:?}", c.name(), cid, other.map(|t| t.0)
                    )))
                }
            }
        }
        let referencing = self.column_owners.values().filter(|o| **o == table).count();
        if referencing != t.columns().len() {
            return Err(CatalogError::cascade(table.0, format!(
                "{} column entries reference the table but it owns {}", referencing, t.columns().len()
            )));
        }

        let Some(removed) = self.tables.remove(&table) else {
            return Err(CatalogError::internal(format!("table {} vanished during delete", table)));
        };
        self.names.remove(removed.name());
        for c in removed.columns() {
            if let Some(cid) = c.id() {
                self.column_owners.remove(&cid);
            }
        }
        debug!(target: "tablecatalog::storage", "delete: table='{}' id={} columns_removed={}", removed.name(), table, removed.columns().len());
        Ok(removed.columns().len())
    }

    /// Column entries anywhere in the catalog that reference `table`.
    pub(crate) fn columns_referencing(&self, table: TableId) -> usize {
        let by_index = self.column_owners.values().filter(|o| **o == table).count();
        let by_record = self.tables.values().flat_map(|t| t.columns()).filter(|c| c.table_id() == Some(table)).count();
        by_index.max(by_record)
    }
}
