use std::path::{Path, PathBuf};

use crate::config::SnapshotFormat;

pub(crate) const BINCODE_SNAPSHOT: &str = "catalog.bin";
pub(crate) const JSON_SNAPSHOT: &str = "catalog.snapshot.json";

pub(crate) fn snapshot_path(root: &Path, format: SnapshotFormat) -> PathBuf {
    match format {
        SnapshotFormat::Bincode => root.join(BINCODE_SNAPSHOT),
        SnapshotFormat::Json => root.join(JSON_SNAPSHOT),
    }
}

/// Snapshot files are written here first and renamed into place.
pub(crate) fn snapshot_tmp_path(root: &Path, format: SnapshotFormat) -> PathBuf {
    let p = snapshot_path(root, format);
    let mut name = p.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    p.with_file_name(name)
}

/// Existing snapshot to load: the configured format first, then the other one
/// so switching formats keeps the catalog.
pub(crate) fn existing_snapshot(root: &Path, preferred: SnapshotFormat) -> Option<(PathBuf, SnapshotFormat)> {
    let other = match preferred {
        SnapshotFormat::Bincode => SnapshotFormat::Json,
        SnapshotFormat::Json => SnapshotFormat::Bincode,
    };
    [preferred, other]
        .into_iter()
        .map(|f| (snapshot_path(root, f), f))
        .find(|(p, _)| p.exists())
}
