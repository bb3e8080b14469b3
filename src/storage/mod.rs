//!
//! tablecatalog storage module
//! ---------------------------
//! This module implements the persisted store behind the table catalog. The
//! store owns every live `TableCatalogRecord` (and through it every column
//! entry), assigns identities, enforces table-name uniqueness and performs
//! cascading deletes. Readers only ever receive detached `TableCatalogView`s.
//!
//! Key responsibilities:
//! - Explicit init (`open`) and teardown (`drop_all`, `destroy`) of catalog state.
//! - Write transactions over a staged copy that publish atomically.
//! - Snapshot persistence under the store root (`catalog.bin` or
//!   `catalog.snapshot.json`), written to a temp file and renamed into place.
//!
//! `CatalogStore` is cheap to clone; clones share the same state.

use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

mod paths;
mod snapshot;
mod state;
pub mod txn;

pub use txn::CatalogTxn;

use crate::catalog::{ColumnCatalogRecord, ColumnCatalogView, ColumnId, TableCatalogRecord, TableCatalogView, TableId};
use crate::config::{CatalogSettings, SETTINGS_FILE};
use crate::error::{CatalogError, CatalogResult};
use state::CatalogState;

struct Inner {
    /// Root folder for settings and snapshots; `None` for in-memory stores.
    root: Option<PathBuf>,
    settings: CatalogSettings,
    state: RwLock<CatalogState>,
    /// Serializes writers so a staged transaction never races another commit.
    writer: Mutex<()>,
}

#[derive(Clone)]
pub struct CatalogStore {
    inner: Arc<Inner>,
}

impl CatalogStore {
    /// Open (or create) a catalog rooted at `root`, loading `catalog.json`
    /// settings with environment overrides and any existing snapshot.
    pub fn open<P: AsRef<Path>>(root: P) -> CatalogResult<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        let settings = CatalogSettings::load_or_default(root)?.with_env_overrides();
        Self::open_with_settings(root, settings)
    }

    /// Open a catalog that must already exist, for inspection. Nothing is
    /// created or written: a missing root is `NotFound` and a missing
    /// `catalog.json` yields defaults in memory.
    pub fn open_existing<P: AsRef<Path>>(root: P) -> CatalogResult<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(CatalogError::not_found(format!("catalog folder '{}'", root.display())));
        }
        let settings = CatalogSettings::load_read_only(root)?.with_env_overrides();
        Self::open_with_settings(root, settings)
    }

    /// Open with explicit settings; nothing is read from `catalog.json`.
    pub fn open_with_settings<P: AsRef<Path>>(root: P, settings: CatalogSettings) -> CatalogResult<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        let state = snapshot::load(&root, settings.persistence.format)?.unwrap_or_default();
        info!(
            target: "tablecatalog::storage",
            "catalog '{}' opened: root='{}' tables={} persist={} format={:?}",
            settings.name,
            root.display(),
            state.tables.len(),
            settings.persistence.enabled,
            settings.persistence.format
        );
        Ok(Self::from_parts(Some(root), settings, state))
    }

    /// A store that lives only in memory.
    pub fn in_memory() -> Self { Self::from_parts(None, CatalogSettings::in_memory(), CatalogState::default()) }

    fn from_parts(root: Option<PathBuf>, settings: CatalogSettings, state: CatalogState) -> Self {
        Self {
            inner: Arc::new(Inner { root, settings, state: RwLock::new(state), writer: Mutex::new(()) }),
        }
    }

    pub fn root_path(&self) -> Option<&Path> { self.inner.root.as_deref() }

    pub fn settings(&self) -> &CatalogSettings { &self.inner.settings }

    /// Run `f` as one write transaction. Changes become visible, and are
    /// persisted, only if `f` returns `Ok`; an `Err` discards all of them.
    /// A failed snapshot write also discards them and surfaces as `Io`.
    ///
    /// Writers are serialized by a non-reentrant lock: `f` must use the
    /// `CatalogTxn` it is given and must not call write methods on this store
    /// (or a clone of it), or it deadlocks.
    pub fn transaction<T, F>(&self, f: F) -> CatalogResult<T>
    where
        F: FnOnce(&mut CatalogTxn<'_>) -> CatalogResult<T>,
    {
        let _writer = self.inner.writer.lock();
        let mut staged = self.inner.state.read().clone();
        let out = {
            let mut txn = CatalogTxn { state: &mut staged, max_identifier_len: self.inner.settings.max_identifier_len };
            f(&mut txn)
        };
        match out {
            Ok(v) => {
                self.persist(&staged)?;
                *self.inner.state.write() = staged;
                Ok(v)
            }
            Err(e) => {
                debug!(target: "tablecatalog::storage", "transaction rolled back: {}", e);
                Err(e)
            }
        }
    }

    fn persist(&self, state: &CatalogState) -> CatalogResult<()> {
        match &self.inner.root {
            Some(root) if self.inner.settings.persistence.enabled => snapshot::save(root, self.inner.settings.persistence.format, state),
            _ => Ok(()),
        }
    }

    /// Write the current state to disk even when per-commit persistence is off.
    pub fn flush(&self) -> CatalogResult<()> {
        let Some(root) = &self.inner.root else { return Ok(()) };
        let _writer = self.inner.writer.lock();
        let st = self.inner.state.read();
        snapshot::save(root, self.inner.settings.persistence.format, &st)
    }

    pub fn insert_table(&self, record: TableCatalogRecord) -> CatalogResult<TableId> {
        self.transaction(|txn| txn.insert_table(record))
    }

    pub fn attach_column(&self, table: TableId, column: ColumnCatalogRecord) -> CatalogResult<ColumnId> {
        self.transaction(|txn| txn.attach_column(table, column))
    }

    pub fn detach_column(&self, table: TableId, column: &str) -> CatalogResult<ColumnCatalogView> {
        self.transaction(|txn| txn.detach_column(table, column))
    }

    pub fn rename_table(&self, table: TableId, new_name: &str) -> CatalogResult<()> {
        self.transaction(|txn| txn.rename_table(table, new_name))
    }

    pub fn set_identifier_column(&self, table: TableId, column: &str) -> CatalogResult<()> {
        self.transaction(|txn| txn.set_identifier_column(table, column))
    }

    /// Delete a table together with every column entry it owns. Returns the
    /// number of column entries removed.
    pub fn delete_table(&self, table: TableId) -> CatalogResult<usize> {
        self.transaction(|txn| txn.delete_table(table))
    }

    pub fn table(&self, table: TableId) -> CatalogResult<TableCatalogView> {
        let st = self.inner.state.read();
        st.tables
            .get(&table)
            .ok_or_else(|| CatalogError::not_found(format!("table {}", table)))?
            .as_immutable_view()
    }

    pub fn table_by_name(&self, name: &str) -> CatalogResult<TableCatalogView> {
        let st = self.inner.state.read();
        let id = st.names.get(name).ok_or_else(|| CatalogError::not_found(format!("table '{}'", name)))?;
        st.tables
            .get(id)
            .ok_or_else(|| CatalogError::internal(format!("name index points at missing table {}", id)))?
            .as_immutable_view()
    }

    pub fn table_id(&self, name: &str) -> Option<TableId> { self.inner.state.read().names.get(name).copied() }

    /// Views of every live table, ordered by identity.
    pub fn tables(&self) -> CatalogResult<Vec<TableCatalogView>> {
        let st = self.inner.state.read();
        st.tables.values().map(|t| t.as_immutable_view()).collect()
    }

    pub fn contains(&self, name: &str) -> bool { self.inner.state.read().names.contains_key(name) }
    pub fn len(&self) -> usize { self.inner.state.read().tables.len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Column entries that reference `table` as their owner.
    pub fn columns_referencing(&self, table: TableId) -> usize { self.inner.state.read().columns_referencing(table) }

    /// Remove every table and column. Identity allocators survive (also on
    /// disk) so identities are never handed out twice.
    pub fn drop_all(&self) -> CatalogResult<usize> {
        let _writer = self.inner.writer.lock();
        let cleared = self.inner.state.read().cleared();
        self.persist(&cleared)?;
        let mut st = self.inner.state.write();
        let dropped = st.tables.len();
        *st = cleared;
        debug!(target: "tablecatalog::storage", "drop_all: catalog='{}' dropped_tables={}", self.inner.settings.name, dropped);
        Ok(dropped)
    }

    /// Remove the snapshot and settings files and reset the in-memory state,
    /// allocators included. The next insert starts again at identity 1, the
    /// same as a store reopened on the now-empty root.
    pub fn destroy(&self) -> CatalogResult<()> {
        let _writer = self.inner.writer.lock();
        if let Some(root) = &self.inner.root {
            snapshot::remove(root)?;
            let settings = root.join(SETTINGS_FILE);
            if settings.exists() {
                std::fs::remove_file(&settings)?;
            }
        }
        *self.inner.state.write() = CatalogState::default();
        info!(target: "tablecatalog::storage", "catalog '{}' destroyed", self.inner.settings.name);
        Ok(())
    }
}
