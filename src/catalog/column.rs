//! Column catalog entries
//! ----------------------
//! `ColumnCatalogRecord` is the mutable, store-owned row describing one column
//! of a table. It only exists inside the owning `TableCatalogRecord`; the store
//! assigns its identity and back-reference when the column is attached.
//! `ColumnCatalogView` is the detached, read-only export of that row.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

use super::{ColumnId, TableId};
use crate::error::{CatalogError, CatalogResult};
use crate::ident;

/// Logical type of a catalog column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Boolean,
    Integer,
    Float,
    Text,
    NdArray,
    Any,
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ColumnType::Boolean => "boolean",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Text => "text",
            ColumnType::NdArray => "ndarray",
            ColumnType::Any => "any",
        };
        f.write_str(s)
    }
}

/// Element type of an `NdArray` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrayType {
    Int8,
    Uint8,
    Int16,
    Int32,
    Int64,
    Float16,
    Float32,
    Float64,
    Str,
    Bool,
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnCatalogRecord {
    pub(crate) id: Option<ColumnId>,
    name: String,
    column_type: ColumnType,
    is_nullable: bool,
    array_type: Option<ArrayType>,
    /// `None` marks an unbounded dimension.
    array_dimensions: Vec<Option<u64>>,
    pub(crate) table_id: Option<TableId>,
}

impl ColumnCatalogRecord {
    /// A transient column: no identity and no owning table yet.
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            id: None,
            name: name.into(),
            column_type,
            is_nullable: false,
            array_type: None,
            array_dimensions: Vec::new(),
            table_id: None,
        }
    }

    pub fn nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self
    }

    /// Describe the element type and shape of an `NdArray` column.
    pub fn with_array(mut self, array_type: ArrayType, dimensions: Vec<Option<u64>>) -> Self {
        self.array_type = Some(array_type);
        self.array_dimensions = dimensions;
        self
    }

    pub fn id(&self) -> Option<ColumnId> { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn column_type(&self) -> ColumnType { self.column_type }
    pub fn is_nullable(&self) -> bool { self.is_nullable }
    pub fn array_type(&self) -> Option<ArrayType> { self.array_type }
    pub fn array_dimensions(&self) -> &[Option<u64>] { &self.array_dimensions }
    pub fn table_id(&self) -> Option<TableId> { self.table_id }
    pub fn is_persisted(&self) -> bool { self.id.is_some() }

    pub(crate) fn validate(&self, max_len: usize) -> CatalogResult<()> {
        ident::check_name("column name", &self.name, max_len)?;
        match (self.column_type, self.array_type) {
            (ColumnType::NdArray, None) => Err(CatalogError::invalid(format!(
                "ndarray column '{}' requires an array type", self.name
            ))),
            (ColumnType::NdArray, Some(_)) => Ok(()),
            (other, Some(_)) => Err(CatalogError::invalid(format!(
                "column '{}' of type {} cannot carry an array type", self.name, other
            ))),
            (_, None) if !self.array_dimensions.is_empty() => Err(CatalogError::invalid(format!(
                "column '{}' has array dimensions but no array type", self.name
            ))),
            _ => Ok(()),
        }
    }

    /// Export a detached view of this column.
    pub fn as_immutable_view(&self) -> CatalogResult<ColumnCatalogView> {
        let id = self.id.ok_or_else(|| CatalogError::unresolved(format!("column '{}'", self.name)))?;
        Ok(ColumnCatalogView {
            id,
            name: self.name.clone(),
            column_type: self.column_type,
            is_nullable: self.is_nullable,
            array_type: self.array_type,
            array_dimensions: self.array_dimensions.clone(),
            table_id: self.table_id,
        })
    }
}

/// Read-only export of a column entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnCatalogView {
    id: ColumnId,
    name: String,
    column_type: ColumnType,
    is_nullable: bool,
    array_type: Option<ArrayType>,
    array_dimensions: Vec<Option<u64>>,
    table_id: Option<TableId>,
}

impl ColumnCatalogView {
    pub fn id(&self) -> ColumnId { self.id }
    pub fn name(&self) -> &str { &self.name }
    pub fn column_type(&self) -> ColumnType { self.column_type }
    pub fn is_nullable(&self) -> bool { self.is_nullable }
    pub fn array_type(&self) -> Option<ArrayType> { self.array_type }
    pub fn array_dimensions(&self) -> &[Option<u64>] { &self.array_dimensions }
    pub fn table_id(&self) -> Option<TableId> { self.table_id }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_column_cannot_export() {
        let c = ColumnCatalogRecord::new("reading", ColumnType::Float);
        let err = c.as_immutable_view().unwrap_err();
        assert_eq!(err.code_str(), "unresolved_reference");
    }

    #[test]
    fn export_copies_every_field() {
        let mut c = ColumnCatalogRecord::new("frame", ColumnType::NdArray)
            .nullable(true)
            .with_array(ArrayType::Uint8, vec![None, Some(3)]);
        c.id = Some(ColumnId(9));
        c.table_id = Some(TableId(2));
        let v = c.as_immutable_view().unwrap();
        assert_eq!(v.id(), ColumnId(9));
        assert_eq!(v.name(), "frame");
        assert_eq!(v.column_type(), ColumnType::NdArray);
        assert!(v.is_nullable());
        assert_eq!(v.array_type(), Some(ArrayType::Uint8));
        assert_eq!(v.array_dimensions(), &[None, Some(3)]);
        assert_eq!(v.table_id(), Some(TableId(2)));
    }

    #[test]
    fn array_type_rules() {
        assert!(ColumnCatalogRecord::new("a", ColumnType::NdArray).validate(100).is_err());
        assert!(ColumnCatalogRecord::new("a", ColumnType::Text)
            .with_array(ArrayType::Str, vec![])
            .validate(100)
            .is_err());
        assert!(ColumnCatalogRecord::new("a", ColumnType::NdArray)
            .with_array(ArrayType::Float32, vec![Some(512)])
            .validate(100)
            .is_ok());
        assert!(ColumnCatalogRecord::new("", ColumnType::Integer).validate(100).is_err());
    }
}
