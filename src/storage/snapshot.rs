use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use super::paths;
use super::state::CatalogState;
use crate::catalog::TableCatalogRecord;
use crate::config::SnapshotFormat;
use crate::error::{CatalogError, CatalogResult};

pub(crate) const SNAPSHOT_VERSION: u32 = 1;

/// On-disk image of the whole catalog. Indexes are not stored; they are
/// rebuilt from the records on load.
#[derive(Serialize, Deserialize)]
pub(crate) struct Snapshot {
    pub(crate) version: u32,
    pub(crate) created_ms: i64,
    pub(crate) last_table_id: u64,
    pub(crate) last_column_id: u64,
    pub(crate) tables: Vec<TableCatalogRecord>,
}

impl Snapshot {
    pub(crate) fn of(state: &CatalogState) -> Self {
        Snapshot {
            version: SNAPSHOT_VERSION,
            created_ms: chrono::Utc::now().timestamp_millis(),
            last_table_id: state.last_table_id,
            last_column_id: state.last_column_id,
            tables: state.tables.values().cloned().collect(),
        }
    }

    pub(crate) fn into_state(self) -> CatalogResult<CatalogState> {
        if self.version != SNAPSHOT_VERSION {
            return Err(CatalogError::Serialization { message: format!("unsupported snapshot version {}", self.version) });
        }
        CatalogState::from_records(self.tables, self.last_table_id, self.last_column_id)
    }
}

pub(crate) fn save(root: &Path, format: SnapshotFormat, state: &CatalogState) -> CatalogResult<()> {
    let snap = Snapshot::of(state);
    let bytes = match format {
        SnapshotFormat::Bincode => bincode::serialize(&snap)?,
        SnapshotFormat::Json => serde_json::to_vec_pretty(&snap)?,
    };
    let tmp = paths::snapshot_tmp_path(root, format);
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, paths::snapshot_path(root, format))?;
    debug!(target: "tablecatalog::storage", "snapshot saved: root='{}' format={:?} tables={}", root.display(), format, snap.tables.len());
    Ok(())
}

/// Load the catalog state under `root`, or `None` when no snapshot exists.
pub(crate) fn load(root: &Path, preferred: SnapshotFormat) -> CatalogResult<Option<CatalogState>> {
    let Some((path, format)) = paths::existing_snapshot(root, preferred) else { return Ok(None) };
    let bytes = std::fs::read(&path)?;
    let snap: Snapshot = match format {
        SnapshotFormat::Bincode => bincode::deserialize(&bytes)?,
        SnapshotFormat::Json => serde_json::from_slice(&bytes)?,
    };
    debug!(target: "tablecatalog::storage", "snapshot loaded: path='{}' version={} created_ms={} tables={}", path.display(), snap.version, snap.created_ms, snap.tables.len());
    snap.into_state().map(Some)
}

/// Remove snapshot files of both formats. Returns true if any existed.
pub(crate) fn remove(root: &Path) -> CatalogResult<bool> {
    let mut removed = false;
    for format in [SnapshotFormat::Bincode, SnapshotFormat::Json] {
        let p = paths::snapshot_path(root, format);
        if p.exists() {
            std::fs::remove_file(&p)?;
            removed = true;
        }
    }
    Ok(removed)
}
