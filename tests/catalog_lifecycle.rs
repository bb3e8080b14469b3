use tablecatalog::{
    CatalogError, CatalogSettings, CatalogStore, ColumnCatalogRecord, ColumnType, SnapshotFormat, TableCatalogRecord,
    TableKind,
};

fn disk_settings() -> CatalogSettings {
    let mut s = CatalogSettings::default();
    s.persistence.enabled = true;
    s.persistence.format = SnapshotFormat::Bincode;
    s
}

#[test]
fn transient_entry_cannot_be_exported() {
    let rec = TableCatalogRecord::new("sensor_data", "/data/sensor_data.table", TableKind::Structured);
    let err = rec.as_immutable_view().expect_err("transient export must fail");
    assert!(matches!(err, CatalogError::UnresolvedReference { .. }));
}

#[test]
fn live_names_stay_unique() {
    let store = CatalogStore::in_memory();
    for (i, kind) in TableKind::ALL.iter().enumerate() {
        store.insert_table(TableCatalogRecord::new(format!("t{}", i), "", *kind)).unwrap();
    }
    assert!(matches!(
        store.insert_table(TableCatalogRecord::new("t3", "", TableKind::Structured)),
        Err(CatalogError::DuplicateTable { .. })
    ));
    let views = store.tables().unwrap();
    let mut names: Vec<&str> = views.iter().map(|v| v.name()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), views.len());
    assert_eq!(views.len(), TableKind::ALL.len());
}

#[test]
fn order_preserved_through_disk_roundtrip() {
    let tmp = tempfile::tempdir().unwrap();
    let id = {
        let store = CatalogStore::open_with_settings(tmp.path(), disk_settings()).unwrap();
        let id = store.insert_table(TableCatalogRecord::new("ordered", "/data/ordered", TableKind::Structured)).unwrap();
        for n in ["c1", "c2", "c3"] {
            store.attach_column(id, ColumnCatalogRecord::new(n, ColumnType::Integer)).unwrap();
        }
        id
    };
    let store = CatalogStore::open_with_settings(tmp.path(), disk_settings()).unwrap();
    let v = store.table(id).unwrap();
    assert_eq!(v.column_names(), vec!["c1", "c2", "c3"]);
    assert_eq!(store.table(id).unwrap(), v);
}

#[test]
fn delete_cascades_and_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let id = {
        let store = CatalogStore::open_with_settings(tmp.path(), disk_settings()).unwrap();
        let id = store
            .insert_table(
                TableCatalogRecord::new("mv_daily", "/views/mv_daily", TableKind::MaterializedView)
                    .with_identifier_column("day")
                    .with_column(ColumnCatalogRecord::new("day", ColumnType::Text))
                    .with_column(ColumnCatalogRecord::new("total", ColumnType::Float)),
            )
            .unwrap();
        assert_eq!(store.delete_table(id).unwrap(), 2);
        id
    };
    let store = CatalogStore::open_with_settings(tmp.path(), disk_settings()).unwrap();
    assert!(store.is_empty());
    assert_eq!(store.columns_referencing(id), 0);
    assert!(matches!(store.table(id), Err(CatalogError::NotFound { .. })));
}

#[test]
fn views_serialize_independently_of_store() {
    let store = CatalogStore::in_memory();
    let id = store
        .insert_table(TableCatalogRecord::new("docs", "s3://bucket/docs", TableKind::Document).with_column(ColumnCatalogRecord::new("id", ColumnType::Integer)))
        .unwrap();
    let view = store.table(id).unwrap();
    drop(store);
    let json = serde_json::to_string(&view).unwrap();
    let back: tablecatalog::TableCatalogView = serde_json::from_str(&json).unwrap();
    assert_eq!(back, view);
    assert_eq!(back.table_kind(), TableKind::Document);
}
