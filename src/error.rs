//! Unified catalog error model and mapping helpers.
//! Every failure surfaced by the catalog records and the catalog store is a
//! `CatalogError`, carrying a stable machine code and an SQLSTATE mapping for
//! the front ends that report catalog failures to clients.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A live table already uses this name.
    #[error("table '{name}' already exists")]
    DuplicateTable { name: String },
    /// The table already has a column with this name.
    #[error("column '{column}' already exists in table '{table}'")]
    DuplicateColumn { table: String, column: String },
    /// An entry was used as if persisted before the store assigned its identity.
    #[error("unresolved reference: {what} has no identity (not persisted)")]
    UnresolvedReference { what: String },
    /// Owned columns could not be removed consistently; nothing was deleted.
    #[error("cascade delete of table {table_id} aborted: {reason}")]
    CascadeDelete { table_id: u64, reason: String },
    #[error("{what} not found")]
    NotFound { what: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("io error: {message}")]
    Io { message: String },
    #[error("serialization error: {message}")]
    Serialization { message: String },
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl CatalogError {
    pub fn code_str(&self) -> &'static str {
        match self {
            CatalogError::DuplicateTable { .. } => "duplicate_table",
            CatalogError::DuplicateColumn { .. } => "duplicate_column",
            CatalogError::UnresolvedReference { .. } => "unresolved_reference",
            CatalogError::CascadeDelete { .. } => "cascade_delete",
            CatalogError::NotFound { .. } => "not_found",
            CatalogError::InvalidInput { .. } => "invalid_input",
            CatalogError::Io { .. } => "io",
            CatalogError::Serialization { .. } => "serialization",
            CatalogError::Internal { .. } => "internal",
        }
    }

    pub fn duplicate_table<S: Into<String>>(name: S) -> Self { CatalogError::DuplicateTable { name: name.into() } }
    pub fn duplicate_column<S: Into<String>>(table: S, column: S) -> Self { CatalogError::DuplicateColumn { table: table.into(), column: column.into() } }
    pub fn unresolved<S: Into<String>>(what: S) -> Self { CatalogError::UnresolvedReference { what: what.into() } }
    pub fn cascade<S: Into<String>>(table_id: u64, reason: S) -> Self { CatalogError::CascadeDelete { table_id, reason: reason.into() } }
    pub fn not_found<S: Into<String>>(what: S) -> Self { CatalogError::NotFound { what: what.into() } }
    pub fn invalid<S: Into<String>>(message: S) -> Self { CatalogError::InvalidInput { message: message.into() } }
    pub fn internal<S: Into<String>>(message: S) -> Self { CatalogError::Internal { message: message.into() } }

    /// True when the caller may retry the same operation later without changing it.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CatalogError::UnresolvedReference { .. } | CatalogError::Io { .. })
    }

    /// Pgwire-style mapping: return (sqlstate, severity).
    pub fn sqlstate(&self) -> (&'static str, &'static str) {
        match self {
            CatalogError::DuplicateTable { .. } => ("42P07", "ERROR"),     // duplicate_table
            CatalogError::DuplicateColumn { .. } => ("42701", "ERROR"),    // duplicate_column
            CatalogError::UnresolvedReference { .. } => ("55000", "ERROR"), // object_not_in_prerequisite_state
            CatalogError::CascadeDelete { .. } => ("2BP01", "ERROR"),      // dependent_objects_still_exist
            CatalogError::NotFound { .. } => ("42P01", "ERROR"),           // undefined_table
            CatalogError::InvalidInput { .. } => ("22000", "ERROR"),       // data exception
            CatalogError::Io { .. } => ("58030", "FATAL"),                 // io_error
            CatalogError::Serialization { .. } | CatalogError::Internal { .. } => ("XX000", "ERROR"),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        // Default mapping: treat as Internal unless downcasted elsewhere
        match err.downcast::<CatalogError>() {
            Ok(e) => e,
            Err(err) => CatalogError::Internal { message: format!("{:#}", err) },
        }
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self { CatalogError::Io { message: err.to_string() } }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self { CatalogError::Serialization { message: err.to_string() } }
}

impl From<bincode::Error> for CatalogError {
    fn from(err: bincode::Error) -> Self { CatalogError::Serialization { message: err.to_string() } }
}
