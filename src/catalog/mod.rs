//! Catalog entity model: table entries, their owned column entries, and the
//! detached views exported from them.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub mod column;
pub mod table;
pub mod table_kind;

pub use column::{ArrayType, ColumnCatalogRecord, ColumnCatalogView, ColumnType};
pub use table::{TableCatalogRecord, TableCatalogView};
pub use table_kind::TableKind;

/// Store-assigned identity of a table entry. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TableId(pub u64);

/// Store-assigned identity of a column entry. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnId(pub u64);

impl Display for TableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

impl Display for ColumnId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}
