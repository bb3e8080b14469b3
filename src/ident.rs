//! Identifier validation utilities
//! ------------------------------
//! Single source of truth for the limits applied to table names, storage
//! locations and column names before they reach the catalog store.

use crate::error::{CatalogError, CatalogResult};

/// Identifier column used when the creator does not name one.
pub const DEFAULT_IDENTIFIER_COLUMN: &str = "id";

/// Width of the persisted string fields (name, storage location, identifier column).
pub const MAX_IDENTIFIER_LEN: usize = 100;

/// Require a non-empty value of at most `max` characters.
pub fn check_name(field: &str, value: &str, max: usize) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::invalid(format!("{} must not be empty", field)));
    }
    check_len(field, value, max)
}

/// Require at most `max` characters; empty is allowed.
pub fn check_len(field: &str, value: &str, max: usize) -> CatalogResult<()> {
    let n = value.chars().count();
    if n > max {
        return Err(CatalogError::invalid(format!("{} is {} characters long (max {})", field, n, max)));
    }
    Ok(())
}
