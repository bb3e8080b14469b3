//! Catalog store settings
//! ----------------------
//! Settings live in `<root>/catalog.json`. Missing files yield defaults (which
//! are then written back so operators can edit them), and a small set of
//! environment variables override what is on disk.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::error::CatalogResult;
use crate::ident::MAX_IDENTIFIER_LEN;

pub const SETTINGS_FILE: &str = "catalog.json";
pub const ENV_PERSIST: &str = "CATALOG_PERSIST";
pub const ENV_SNAPSHOT_FORMAT: &str = "CATALOG_SNAPSHOT_FORMAT";
pub const ENV_DB_FOLDER: &str = "CATALOG_DB_FOLDER";
pub const DEFAULT_DB_FOLDER: &str = "dbs/catalog";

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotFormat {
    /// Compact binary snapshot (`catalog.bin`).
    Bincode,
    /// Human-readable snapshot (`catalog.snapshot.json`).
    Json,
}

impl SnapshotFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bincode" | "bin" => Some(SnapshotFormat::Bincode),
            "json" => Some(SnapshotFormat::Json),
            _ => None,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct PersistenceSettings {
    /// Write a snapshot after every committed transaction.
    #[serde(default = "PersistenceSettings::default_enabled")]
    pub enabled: bool,
    #[serde(default = "PersistenceSettings::default_format")]
    pub format: SnapshotFormat,
}

impl PersistenceSettings {
    fn default_enabled() -> bool { true }
    fn default_format() -> SnapshotFormat { SnapshotFormat::Bincode }
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self { enabled: Self::default_enabled(), format: Self::default_format() }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CatalogSettings {
    /// Display name of the catalog, used in log lines.
    #[serde(default = "CatalogSettings::default_name")]
    pub name: String,
    /// Maximum length in characters of names, storage locations and identifier columns.
    #[serde(default = "CatalogSettings::default_max_identifier_len")]
    pub max_identifier_len: usize,
    #[serde(default)]
    pub persistence: PersistenceSettings,
}

impl CatalogSettings {
    fn default_name() -> String { "catalog".to_string() }
    fn default_max_identifier_len() -> usize { MAX_IDENTIFIER_LEN }

    /// Settings for a store that never touches disk.
    pub fn in_memory() -> Self {
        let mut s = Self::default();
        s.persistence.enabled = false;
        s
    }

    /// Load `<root>/catalog.json`, writing defaults when the file is absent.
    /// A file that is not valid JSON is logged and replaced in memory by
    /// defaults; any other read error is returned.
    pub fn load_or_default(root: &Path) -> CatalogResult<Self> {
        let path = root.join(SETTINGS_FILE);
        let settings = match std::fs::read(&path) {
            Ok(bytes) => Self::parse_or_default(&path, &bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let s = Self::default();
                s.save(root)?;
                debug!(target: "tablecatalog::config", "wrote default settings to '{}'", path.display());
                s
            }
            Err(e) => return Err(e.into()),
        };
        Ok(settings)
    }

    /// Like `load_or_default` but never writes: an absent file yields
    /// defaults in memory only.
    pub fn load_read_only(root: &Path) -> CatalogResult<Self> {
        let path = root.join(SETTINGS_FILE);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Self::parse_or_default(&path, &bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn parse_or_default(path: &Path, bytes: &[u8]) -> Self {
        match serde_json::from_slice::<CatalogSettings>(bytes) {
            Ok(s) => s,
            Err(e) => {
                warn!(target: "tablecatalog::config", "ignoring invalid settings file '{}': {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, root: &Path) -> CatalogResult<()> {
        let bytes = serde_json::to_vec_pretty(self)?;
        std::fs::write(root.join(SETTINGS_FILE), bytes)?;
        Ok(())
    }

    /// Apply `CATALOG_PERSIST` and `CATALOG_SNAPSHOT_FORMAT` when set.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(std::env::var(ENV_PERSIST).ok().as_deref(), std::env::var(ENV_SNAPSHOT_FORMAT).ok().as_deref())
    }

    pub(crate) fn with_overrides(mut self, persist: Option<&str>, format: Option<&str>) -> Self {
        if let Some(v) = persist {
            match parse_bool(v) {
                Some(b) => self.persistence.enabled = b,
                None => warn!(target: "tablecatalog::config", "ignoring {}='{}' (expected true/false)", ENV_PERSIST, v),
            }
        }
        if let Some(v) = format {
            match SnapshotFormat::parse(v) {
                Some(f) => self.persistence.format = f,
                None => warn!(target: "tablecatalog::config", "ignoring {}='{}' (expected bincode/json)", ENV_SNAPSHOT_FORMAT, v),
            }
        }
        self
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            max_identifier_len: Self::default_max_identifier_len(),
            persistence: PersistenceSettings::default(),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Catalog root folder from `CATALOG_DB_FOLDER`, defaulting to `dbs/catalog`.
pub fn db_folder_from_env() -> String {
    std::env::var(ENV_DB_FOLDER).unwrap_or_else(|_| DEFAULT_DB_FOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_written_when_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let s = CatalogSettings::load_or_default(tmp.path()).unwrap();
        assert_eq!(s, CatalogSettings::default());
        assert!(tmp.path().join(SETTINGS_FILE).exists());
        assert_eq!(s.max_identifier_len, 100);
        assert!(s.persistence.enabled);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(SETTINGS_FILE), r#"{"name":"main","persistence":{"format":"json"}}"#).unwrap();
        let s = CatalogSettings::load_or_default(tmp.path()).unwrap();
        assert_eq!(s.name, "main");
        assert_eq!(s.persistence.format, SnapshotFormat::Json);
        assert!(s.persistence.enabled);
        assert_eq!(s.max_identifier_len, 100);
    }

    #[test]
    fn invalid_file_falls_back() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(SETTINGS_FILE), "not json").unwrap();
        let s = CatalogSettings::load_or_default(tmp.path()).unwrap();
        assert_eq!(s, CatalogSettings::default());
    }

    #[test]
    fn unreadable_file_is_an_error_and_not_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        // A directory in place of the file fails the read with something other than NotFound
        std::fs::create_dir(tmp.path().join(SETTINGS_FILE)).unwrap();
        let err = CatalogSettings::load_or_default(tmp.path()).err().unwrap();
        assert_eq!(err.code_str(), "io");
        assert!(tmp.path().join(SETTINGS_FILE).is_dir());
        assert_eq!(CatalogSettings::load_read_only(tmp.path()).err().unwrap().code_str(), "io");
    }

    #[test]
    fn read_only_load_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let s = CatalogSettings::load_read_only(tmp.path()).unwrap();
        assert_eq!(s, CatalogSettings::default());
        assert!(!tmp.path().join(SETTINGS_FILE).exists());
    }

    #[test]
    fn overrides_apply_and_ignore_garbage() {
        let s = CatalogSettings::default().with_overrides(Some("off"), Some("JSON"));
        assert!(!s.persistence.enabled);
        assert_eq!(s.persistence.format, SnapshotFormat::Json);
        let s = CatalogSettings::default().with_overrides(Some("maybe"), Some("xml"));
        assert_eq!(s, CatalogSettings::default());
    }
}
