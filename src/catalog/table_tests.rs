use super::*;
use crate::catalog::{ArrayType, ColumnType};

fn persisted(name: &str, id: u64) -> TableCatalogRecord {
    let mut t = TableCatalogRecord::new(name, format!("/data/{}.table", name), TableKind::Structured);
    t.id = Some(TableId(id));
    t
}

#[test]
fn new_entry_is_transient_with_defaults() {
    let t = TableCatalogRecord::new("sensor_data", "/data/sensor_data.table", TableKind::Structured);
    assert!(!t.is_persisted());
    assert_eq!(t.identifier_column(), "id");
    assert!(t.columns().is_empty());
    assert_eq!(t.storage_location(), "/data/sensor_data.table");
}

#[test]
fn export_before_persist_is_unresolved() {
    let t = TableCatalogRecord::new("t", "", TableKind::Video);
    match t.as_immutable_view() {
        Err(CatalogError::UnresolvedReference { what }) => assert!(what.contains("'t'")),
        other => panic!("expected UnresolvedReference, got {:?}", other),
    }
}

#[test]
fn export_preserves_attachment_order() {
    let mut t = persisted("ordered", 1);
    t.push_column(ColumnCatalogRecord::new("c1", ColumnType::Integer), ColumnId(10)).unwrap();
    t.push_column(ColumnCatalogRecord::new("c2", ColumnType::Text), ColumnId(11)).unwrap();
    t.push_column(ColumnCatalogRecord::new("c3", ColumnType::Float), ColumnId(12)).unwrap();
    let v = t.as_immutable_view().unwrap();
    assert_eq!(v.column_names(), vec!["c1", "c2", "c3"]);
    assert!(v.columns().iter().all(|c| c.table_id() == Some(TableId(1))));
}

#[test]
fn view_is_detached_from_later_mutation() {
    let mut t = persisted("detached", 4);
    t.push_column(ColumnCatalogRecord::new("id", ColumnType::Integer), ColumnId(1)).unwrap();
    let before = t.as_immutable_view().unwrap();

    t.push_column(ColumnCatalogRecord::new("extra", ColumnType::Text), ColumnId(2)).unwrap();
    t.remove_column("id");
    t.identifier_column = "extra".into();

    assert_eq!(before.column_names(), vec!["id"]);
    assert_eq!(before.identifier_column(), "id");
    let after = t.as_immutable_view().unwrap();
    assert_eq!(after.column_names(), vec!["extra"]);
}

#[test]
fn repeated_exports_keep_identity() {
    let t = persisted("stable", 42);
    let a = t.as_immutable_view().unwrap();
    let b = t.as_immutable_view().unwrap();
    assert_eq!(a.id(), TableId(42));
    assert_eq!(a, b);
}

#[test]
fn push_rejects_duplicates() {
    let mut t = persisted("dups", 2);
    t.push_column(ColumnCatalogRecord::new("a", ColumnType::Integer), ColumnId(1)).unwrap();
    let err = t.push_column(ColumnCatalogRecord::new("a", ColumnType::Text), ColumnId(2)).unwrap_err();
    assert_eq!(err.code_str(), "duplicate_column");
    let err = t.push_column(ColumnCatalogRecord::new("b", ColumnType::Text), ColumnId(1)).unwrap_err();
    assert_eq!(err.code_str(), "internal");
    assert_eq!(t.columns().len(), 1);
}

#[test]
fn push_requires_identity() {
    let mut t = TableCatalogRecord::new("transient", "", TableKind::Structured);
    let err = t.push_column(ColumnCatalogRecord::new("a", ColumnType::Integer), ColumnId(1)).unwrap_err();
    assert_eq!(err.code_str(), "unresolved_reference");
}

#[test]
fn remove_keeps_remaining_order() {
    let mut t = persisted("rm", 3);
    for (i, n) in ["a", "b", "c", "d"].iter().enumerate() {
        t.push_column(ColumnCatalogRecord::new(*n, ColumnType::Integer), ColumnId(i as u64 + 1)).unwrap();
    }
    let removed = t.remove_column("b").unwrap();
    assert_eq!(removed.id(), Some(ColumnId(2)));
    assert!(t.remove_column("zz").is_none());
    let names: Vec<&str> = t.columns().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["a", "c", "d"]);
}

#[test]
fn validate_checks_staged_columns() {
    let t = TableCatalogRecord::new("media", "/m", TableKind::Image)
        .with_column(ColumnCatalogRecord::new("data", ColumnType::NdArray).with_array(ArrayType::Uint8, vec![None, None, Some(3)]))
        .with_column(ColumnCatalogRecord::new("data", ColumnType::Text));
    assert_eq!(t.validate(100).unwrap_err().code_str(), "duplicate_column");

    let long = "x".repeat(101);
    let t = TableCatalogRecord::new(long.as_str(), "", TableKind::Structured);
    assert_eq!(t.validate(100).unwrap_err().code_str(), "invalid_input");
    let t = TableCatalogRecord::new("ok", "", TableKind::Structured).with_identifier_column("");
    assert!(t.validate(100).is_err());
}

#[test]
fn identifier_position_and_json() {
    let mut t = persisted("pos", 5).with_identifier_column("key");
    t.push_column(ColumnCatalogRecord::new("value", ColumnType::Text), ColumnId(1)).unwrap();
    t.push_column(ColumnCatalogRecord::new("key", ColumnType::Integer), ColumnId(2)).unwrap();
    let v = t.as_immutable_view().unwrap();
    assert_eq!(v.identifier_position(), Some(1));
    let j = v.to_json().unwrap();
    assert_eq!(j["name"], "pos");
    assert_eq!(j["table_kind"], "structured");
    assert_eq!(j["columns"].as_array().map(|a| a.len()), Some(2));
}

#[test]
fn views_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<TableCatalogView>();
}
