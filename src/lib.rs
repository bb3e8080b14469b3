pub mod catalog;
pub mod config;
pub mod error;
pub mod ident;
pub mod storage;

pub use catalog::{
    ArrayType, ColumnCatalogRecord, ColumnCatalogView, ColumnId, ColumnType, TableCatalogRecord, TableCatalogView,
    TableId, TableKind,
};
pub use config::{CatalogSettings, PersistenceSettings, SnapshotFormat};
pub use error::{CatalogError, CatalogResult};
pub use storage::{CatalogStore, CatalogTxn};

// Test-only printing helper: expands to eprintln! during tests and is absent otherwise.
// Usage in tests: tprintln!("debug: {}", value);
#[cfg(any(test, debug_assertions))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ( eprintln!($($arg)*) );
}

// In non-test builds, provide a no-op tprintln! so calls compile without effect.
#[cfg(not(any(test, debug_assertions)))]
#[macro_export]
macro_rules! tprintln {
    ($($arg:tt)*) => ({
        // Preserve formatting checks in release without producing code
        if false { let _ = format!($($arg)*); }
    });
}
